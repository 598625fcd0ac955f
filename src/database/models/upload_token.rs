use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Short-lived capability token letting a seller push paperwork for one
/// deal. Only the sha256 digest of the issued secret is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UploadToken {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub token_digest: String,
    pub deal_id: Uuid,
    pub seller_email: String,
    pub upload_attempts: i32,
    pub max_upload_attempts: i32,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub uploaded_files: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl UploadToken {
    /// A token is usable only while it is active, has attempts left, and
    /// has not expired. Expiry and exhaustion win over `is_active`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.upload_attempts < self.max_upload_attempts
            && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(attempts: i32, max: i32, active: bool, ttl_hours: i64) -> UploadToken {
        let now = Utc::now();
        UploadToken {
            id: Uuid::new_v4(),
            token_digest: "digest".to_string(),
            deal_id: Uuid::new_v4(),
            seller_email: "seller@example.com".to_string(),
            upload_attempts: attempts,
            max_upload_attempts: max,
            is_active: active,
            expires_at: now + Duration::hours(ttl_hours),
            uploaded_files: Json(vec![]),
            created_at: now,
        }
    }

    #[test]
    fn fresh_token_is_valid() {
        assert!(token(0, 5, true, 24).is_valid(Utc::now()));
    }

    #[test]
    fn exhausted_attempts_invalidate() {
        assert!(!token(5, 5, true, 24).is_valid(Utc::now()));
        assert!(!token(6, 5, true, 24).is_valid(Utc::now()));
    }

    #[test]
    fn expiry_wins_over_is_active() {
        // expired an hour ago but still flagged active
        let t = token(0, 5, true, -1);
        assert!(!t.is_valid(Utc::now()));
    }

    #[test]
    fn deactivated_token_is_invalid() {
        assert!(!token(0, 5, false, 24).is_valid(Utc::now()));
    }
}
