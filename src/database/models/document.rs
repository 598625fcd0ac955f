use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kinds of generated/stored artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "bill-of-sale")]
    BillOfSale,
    #[serde(rename = "title-reassignment")]
    TitleReassignment,
    #[serde(rename = "seller-upload")]
    SellerUpload,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BillOfSale => "bill-of-sale",
            DocumentType::TitleReassignment => "title-reassignment",
            DocumentType::SellerUpload => "seller-upload",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bill-of-sale" => Some(DocumentType::BillOfSale),
            "title-reassignment" => Some(DocumentType::TitleReassignment),
            "seller-upload" => Some(DocumentType::SellerUpload),
            _ => None,
        }
    }

    /// Human title printed at the top of the artifact
    pub fn display_title(&self) -> &'static str {
        match self {
            DocumentType::BillOfSale => "BILL OF SALE",
            DocumentType::TitleReassignment => "TITLE REASSIGNMENT",
            DocumentType::SellerUpload => "SELLER UPLOAD",
        }
    }
}

/// Generated legal document. The rendered body is stored in-row; object
/// storage and signed URLs are outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub vin: Option<String>,
    pub doc_type: String,
    pub buyer: Option<sqlx::types::Json<serde_json::Value>>,
    pub seller: Option<sqlx::types::Json<serde_json::Value>>,
    pub body: String,
    pub generated_at: DateTime<Utc>,
}
