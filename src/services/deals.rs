use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{DealContact, FinanceDeal};
use crate::sync::stage::{DealPriority, FinanceStage, StageParseError};

use super::dealers::DealerService;

#[derive(Debug, thiserror::Error)]
pub enum DealError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Deal not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Stage(#[from] StageParseError),
}

/// Intake payload. Stage and priority accept any historical spelling and
/// are stored canonical.
#[derive(Debug, Clone, Deserialize)]
pub struct DealInput {
    pub vin: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub list_price: Option<Decimal>,
    pub wholesale_price: Option<Decimal>,
    pub seller: Option<DealContact>,
    pub buyer: Option<DealContact>,
    pub current_stage: Option<String>,
    pub priority: Option<String>,
    pub dealer_name: Option<String>,
}

pub struct DealService {
    pool: PgPool,
}

impl DealService {
    pub async fn new() -> Result<Self, DealError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    /// Construct against an explicit pool (CLI, tests)
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FinanceDeal>, DealError> {
        let deals = sqlx::query_as::<_, FinanceDeal>(
            "SELECT * FROM finance_deals ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(deals)
    }

    pub async fn get(&self, id: Uuid) -> Result<FinanceDeal, DealError> {
        sqlx::query_as::<_, FinanceDeal>("SELECT * FROM finance_deals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DealError::NotFound(id))
    }

    /// Create a finance deal. Normalizes stage/priority at the edge and,
    /// when the deal names an unrecognized dealer, creates the CRM record
    /// opportunistically. Dealer bookkeeping is best-effort: a failure
    /// there is logged, never propagated to the intake caller.
    pub async fn create(&self, input: DealInput) -> Result<FinanceDeal, DealError> {
        let stage = match input.current_stage.as_deref() {
            Some(raw) => FinanceStage::parse(raw)?,
            None => FinanceStage::Intake,
        };
        let priority = match input.priority.as_deref() {
            Some(raw) => DealPriority::parse(raw)?,
            None => DealPriority::Medium,
        };

        let deal = sqlx::query_as::<_, FinanceDeal>(
            r#"
            INSERT INTO finance_deals
                (id, vin, year, make, model, purchase_price, list_price, wholesale_price,
                 seller, buyer, current_stage, priority, dealer_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.vin.as_deref().map(str::trim))
        .bind(input.year)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.purchase_price)
        .bind(input.list_price)
        .bind(input.wholesale_price)
        .bind(input.seller.clone().map(Json))
        .bind(input.buyer.clone().map(Json))
        .bind(stage.as_str())
        .bind(priority.as_str())
        .bind(&input.dealer_name)
        .fetch_one(&self.pool)
        .await?;

        if let Some(dealer_name) = deal.dealer_name.as_deref() {
            let dealers = DealerService::with_pool(self.pool.clone());
            if let Err(e) = dealers
                .record_deal(dealer_name, input.seller.as_ref(), deal.purchase_price)
                .await
            {
                tracing::warn!(
                    "dealer bookkeeping failed for '{}' on deal {}: {}",
                    dealer_name,
                    deal.id,
                    e
                );
            }
        }

        Ok(deal)
    }

    pub async fn update(&self, id: Uuid, input: DealInput) -> Result<FinanceDeal, DealError> {
        let stage = match input.current_stage.as_deref() {
            Some(raw) => Some(FinanceStage::parse(raw)?),
            None => None,
        };
        let priority = match input.priority.as_deref() {
            Some(raw) => Some(DealPriority::parse(raw)?),
            None => None,
        };

        let deal = sqlx::query_as::<_, FinanceDeal>(
            r#"
            UPDATE finance_deals SET
                vin = COALESCE($2, vin),
                year = COALESCE($3, year),
                make = COALESCE($4, make),
                model = COALESCE($5, model),
                purchase_price = COALESCE($6, purchase_price),
                list_price = COALESCE($7, list_price),
                wholesale_price = COALESCE($8, wholesale_price),
                seller = COALESCE($9, seller),
                buyer = COALESCE($10, buyer),
                current_stage = COALESCE($11, current_stage),
                priority = COALESCE($12, priority),
                dealer_name = COALESCE($13, dealer_name),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.vin.as_deref().map(str::trim))
        .bind(input.year)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.purchase_price)
        .bind(input.list_price)
        .bind(input.wholesale_price)
        .bind(input.seller.map(Json))
        .bind(input.buyer.map(Json))
        .bind(stage.map(|s| s.as_str()))
        .bind(priority.map(|p| p.as_str()))
        .bind(&input.dealer_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DealError::NotFound(id))?;

        Ok(deal)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DealError> {
        let result = sqlx::query("DELETE FROM finance_deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DealError::NotFound(id));
        }
        Ok(())
    }

    /// Move a deal to a new finance stage (any historical spelling accepted)
    pub async fn set_stage(
        &self,
        id: Uuid,
        stage_raw: &str,
        priority_raw: Option<&str>,
    ) -> Result<FinanceDeal, DealError> {
        let stage = FinanceStage::parse(stage_raw)?;
        let priority = match priority_raw {
            Some(raw) => Some(DealPriority::parse(raw)?),
            None => None,
        };

        sqlx::query_as::<_, FinanceDeal>(
            r#"
            UPDATE finance_deals
            SET current_stage = $2, priority = COALESCE($3, priority), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stage.as_str())
        .bind(priority.map(|p| p.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DealError::NotFound(id))
    }
}
