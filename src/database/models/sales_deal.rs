use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::finance_deal::DealContact;

/// One entry in the append-only stage log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageHistoryEntry {
    pub stage: String,
    pub entered_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Denormalized projection of a finance deal used by the sales pipeline.
/// Keyed by VIN; the UNIQUE index on `vin` is what keeps materialization
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalesDeal {
    pub id: Uuid,
    pub vin: String,
    pub source_deal_id: Option<Uuid>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub list_price: Option<Decimal>,
    pub current_stage: String,
    pub priority: String,
    pub stage_history: Json<Vec<StageHistoryEntry>>,
    pub sales_person: Option<Json<DealContact>>,
    pub customer: Option<Json<DealContact>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
