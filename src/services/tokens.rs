use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::UploadToken;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Deal not found: {0}")]
    DealNotFound(Uuid),
    #[error("Upload token not recognized")]
    UnknownToken,
    #[error("Upload token deactivated")]
    Inactive,
    #[error("Upload token expired")]
    Expired,
    #[error("Upload attempts exhausted")]
    AttemptsExhausted,
}

/// The secret leaves the process exactly once, in this response
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub deal_id: Uuid,
    pub seller_email: String,
    pub expires_at: DateTime<Utc>,
    pub max_upload_attempts: i32,
}

pub struct TokenService {
    pool: PgPool,
}

impl TokenService {
    pub async fn new() -> Result<Self, TokenError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn digest(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Issue a fresh capability token binding a seller email to a deal.
    /// Only the sha256 digest is stored.
    pub async fn issue(&self, deal_id: Uuid, seller_email: &str) -> Result<IssuedToken, TokenError> {
        let deal_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM finance_deals WHERE id = $1")
                .bind(deal_id)
                .fetch_optional(&self.pool)
                .await?;
        if deal_exists.is_none() {
            return Err(TokenError::DealNotFound(deal_id));
        }

        let uploads = &config::config().uploads;
        let secret = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::hours(uploads.token_ttl_hours);

        sqlx::query(
            r#"
            INSERT INTO upload_tokens
                (id, token_digest, deal_id, seller_email, max_upload_attempts, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Self::digest(&secret))
        .bind(deal_id)
        .bind(seller_email)
        .bind(uploads.max_upload_attempts)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(IssuedToken {
            token: secret,
            deal_id,
            seller_email: seller_email.to_string(),
            expires_at,
            max_upload_attempts: uploads.max_upload_attempts,
        })
    }

    /// Present a token and record one upload. Every presentation of a
    /// recognized token burns an attempt, valid or not, so a leaked link
    /// cannot be probed indefinitely.
    pub async fn consume(&self, secret: &str, file_name: &str) -> Result<UploadToken, TokenError> {
        let now = Utc::now();

        let token = sqlx::query_as::<_, UploadToken>(
            r#"
            UPDATE upload_tokens
            SET upload_attempts = upload_attempts + 1
            WHERE token_digest = $1
            RETURNING *
            "#,
        )
        .bind(Self::digest(secret))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TokenError::UnknownToken)?;

        if !token.is_active {
            return Err(TokenError::Inactive);
        }
        if now >= token.expires_at {
            return Err(TokenError::Expired);
        }
        // attempts were already incremented above
        if token.upload_attempts > token.max_upload_attempts {
            return Err(TokenError::AttemptsExhausted);
        }

        let token = sqlx::query_as::<_, UploadToken>(
            r#"
            UPDATE upload_tokens
            SET uploaded_files = uploaded_files || to_jsonb($2::text)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(token.id)
        .bind(file_name)
        .fetch_one(&self.pool)
        .await?;

        // keep an artifact row so the paperwork shows up with the deal
        let insert = sqlx::query(
            r#"
            INSERT INTO documents (id, deal_id, vin, doc_type, body, generated_at)
            SELECT $1, d.id, d.vin, 'seller-upload', $3, $4
            FROM finance_deals d WHERE d.id = $2
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token.deal_id)
        .bind(format!(
            "Received '{}' from {}",
            file_name, token.seller_email
        ))
        .bind(now)
        .execute(&self.pool)
        .await;
        if let Err(e) = insert {
            tracing::warn!("failed to record seller upload for deal {}: {}", token.deal_id, e);
        }

        Ok(token)
    }

    pub async fn list_for_deal(&self, deal_id: Uuid) -> Result<Vec<UploadToken>, TokenError> {
        let tokens = sqlx::query_as::<_, UploadToken>(
            "SELECT * FROM upload_tokens WHERE deal_id = $1 ORDER BY created_at DESC",
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }

    /// Revoke a token early
    pub async fn deactivate(&self, id: Uuid) -> Result<(), TokenError> {
        let result = sqlx::query("UPDATE upload_tokens SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TokenError::UnknownToken);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hex() {
        let d1 = TokenService::digest("secret-token");
        let d2 = TokenService::digest("secret-token");
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        assert!(d1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(TokenService::digest("other"), d1);
    }
}
