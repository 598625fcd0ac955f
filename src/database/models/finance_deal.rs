use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Contact block as it appeared in the source documents. Every field is
/// optional; historical records are inconsistently shaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealContact {
    pub name: Option<String>,
    /// `type` in the historical JSON ("dealer", "private", "broker", ...)
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl DealContact {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

/// A deal record owned by the finance back-office workflow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FinanceDeal {
    pub id: Uuid,
    pub vin: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub list_price: Option<Decimal>,
    pub wholesale_price: Option<Decimal>,
    pub seller: Option<Json<DealContact>>,
    pub buyer: Option<Json<DealContact>>,
    /// Free-form at rest; normalized through `sync::stage` at the edges
    pub current_stage: String,
    pub priority: String,
    pub dealer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
