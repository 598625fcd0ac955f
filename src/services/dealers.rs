use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{DealContact, Dealer};

#[derive(Debug, thiserror::Error)]
pub enum DealerError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Dealer not found: {0}")]
    NotFound(Uuid),
    #[error("Dealer already exists: {0}")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealerInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

pub struct DealerService {
    pool: PgPool,
}

impl DealerService {
    pub async fn new() -> Result<Self, DealerError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Dealer>, DealerError> {
        let dealers = sqlx::query_as::<_, Dealer>("SELECT * FROM dealers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(dealers)
    }

    pub async fn get(&self, id: Uuid) -> Result<Dealer, DealerError> {
        sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DealerError::NotFound(id))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Dealer>, DealerError> {
        let dealer = sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dealer)
    }

    pub async fn create(&self, input: DealerInput) -> Result<Dealer, DealerError> {
        let result = sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers (id, name, contact_person, phone, email, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.name.trim())
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(dealer) => Ok(dealer),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DealerError::DuplicateName(input.name))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(&self, id: Uuid, input: DealerInput) -> Result<Dealer, DealerError> {
        sqlx::query_as::<_, Dealer>(
            r#"
            UPDATE dealers SET
                name = $2,
                contact_person = COALESCE($3, contact_person),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                address = COALESCE($6, address),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DealerError::NotFound(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DealerError> {
        let result = sqlx::query("DELETE FROM dealers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DealerError::NotFound(id));
        }
        Ok(())
    }

    /// Bump the dealer's aggregates for a new deal, creating the CRM row
    /// from the deal's seller contact when the name is unrecognized.
    pub async fn record_deal(
        &self,
        name: &str,
        seller: Option<&DealContact>,
        volume: Option<Decimal>,
    ) -> Result<Dealer, DealerError> {
        let volume = volume.unwrap_or_default();

        let updated = sqlx::query_as::<_, Dealer>(
            r#"
            UPDATE dealers
            SET total_deals = total_deals + 1,
                total_volume = total_volume + $2,
                updated_at = now()
            WHERE name = $1
            RETURNING *
            "#,
        )
        .bind(name.trim())
        .bind(volume)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(dealer) = updated {
            return Ok(dealer);
        }

        // Unrecognized name: auto-create from whatever contact data the
        // deal carried. A concurrent creator may win the unique index; fall
        // back to bumping the row that got there first.
        let inserted = sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers
                (id, name, contact_person, phone, email, address, total_deals, total_volume)
            VALUES ($1, $2, $3, $4, $5, $6, 1, $7)
            ON CONFLICT (name) DO UPDATE
            SET total_deals = dealers.total_deals + 1,
                total_volume = dealers.total_volume + EXCLUDED.total_volume,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name.trim())
        .bind(seller.and_then(|s| s.name.clone()))
        .bind(seller.and_then(|s| s.phone.clone()))
        .bind(seller.and_then(|s| s.email.clone()))
        .bind(seller.and_then(|s| s.address.clone()))
        .bind(volume)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("auto-created dealer '{}' from deal intake", inserted.name);
        Ok(inserted)
    }

    /// Rebuild both aggregates from the finance deals table. Returns the
    /// number of dealer rows touched.
    pub async fn recompute_metrics(&self) -> Result<u64, DealerError> {
        sqlx::query("UPDATE dealers SET total_deals = 0, total_volume = 0, updated_at = now()")
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            r#"
            UPDATE dealers d
            SET total_deals = agg.deals,
                total_volume = agg.volume,
                updated_at = now()
            FROM (
                SELECT dealer_name,
                       COUNT(*) AS deals,
                       COALESCE(SUM(purchase_price), 0) AS volume
                FROM finance_deals
                WHERE dealer_name IS NOT NULL
                GROUP BY dealer_name
            ) agg
            WHERE d.name = agg.dealer_name
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
