use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{SalesDeal, StageHistoryEntry};
use crate::sync::stage::{SalesStage, StageParseError};

#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Sales deal not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Stage(#[from] StageParseError),
}

pub struct SalesService {
    pool: PgPool,
}

impl SalesService {
    pub async fn new() -> Result<Self, SalesError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<SalesDeal>, SalesError> {
        let deals = sqlx::query_as::<_, SalesDeal>(
            "SELECT * FROM sales_deals ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(deals)
    }

    pub async fn get(&self, id: Uuid) -> Result<SalesDeal, SalesError> {
        sqlx::query_as::<_, SalesDeal>("SELECT * FROM sales_deals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(SalesError::NotFound(id))
    }

    /// Move a sales deal to a new pipeline stage. The history log only
    /// ever grows; the transition appends, it never rewrites.
    pub async fn transition(
        &self,
        id: Uuid,
        stage_raw: &str,
        note: Option<String>,
    ) -> Result<SalesDeal, SalesError> {
        let stage = SalesStage::parse(stage_raw)?;
        let entry = StageHistoryEntry {
            stage: stage.as_str().to_string(),
            entered_at: Utc::now(),
            note,
        };

        sqlx::query_as::<_, SalesDeal>(
            r#"
            UPDATE sales_deals
            SET current_stage = $2,
                stage_history = stage_history || $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stage.as_str())
        .bind(Json(&entry))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SalesError::NotFound(id))
    }
}
