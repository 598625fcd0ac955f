use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Document, DocumentType, FinanceDeal};
use crate::documents::party::{resolve_buyer, resolve_seller, MissingParty, ResolvedParty};
use crate::documents::render::{render_document, Letterhead};

use super::dealers::DealerService;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Deal not found: {0}")]
    DealNotFound(Uuid),
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),
    #[error("Cannot resolve {side}: {reason}")]
    UnresolvedParty {
        side: &'static str,
        reason: MissingParty,
    },
}

/// Outcome of a generate-for-all-deals batch
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub examined: usize,
    pub generated: usize,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub deal_id: Uuid,
    pub reason: String,
}

pub struct DocumentService {
    pool: PgPool,
}

impl DocumentService {
    pub async fn new() -> Result<Self, DocumentError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_deal(&self, deal_id: Uuid) -> Result<FinanceDeal, DocumentError> {
        sqlx::query_as::<_, FinanceDeal>("SELECT * FROM finance_deals WHERE id = $1")
            .bind(deal_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DocumentError::DealNotFound(deal_id))
    }

    /// Generate one legal document for a deal. Both parties must resolve;
    /// a deal with absent or placeholder buyer data is refused with the
    /// reason rather than silently printing the selling organization.
    pub async fn generate(
        &self,
        deal_id: Uuid,
        doc_type: DocumentType,
    ) -> Result<Document, DocumentError> {
        let deal = self.fetch_deal(deal_id).await?;

        let dealer = match deal.dealer_name.as_deref() {
            Some(name) => DealerService::with_pool(self.pool.clone())
                .find_by_name(name)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        let buyer = match resolve_buyer(&deal) {
            ResolvedParty::Known(identity) => identity,
            ResolvedParty::Unknown(reason) => {
                return Err(DocumentError::UnresolvedParty { side: "buyer", reason })
            }
        };
        let seller = match resolve_seller(&deal, dealer.as_ref()) {
            ResolvedParty::Known(identity) => identity,
            ResolvedParty::Unknown(reason) => {
                return Err(DocumentError::UnresolvedParty { side: "seller", reason })
            }
        };

        let docs_config = &config::config().documents;
        let generated_at = chrono::Utc::now();
        let body = render_document(
            doc_type,
            &deal,
            &buyer,
            &seller,
            &Letterhead {
                name: &docs_config.letterhead_name,
                address: &docs_config.letterhead_address,
            },
            generated_at,
        );

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, deal_id, vin, doc_type, buyer, seller, body, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(deal.id)
        .bind(&deal.vin)
        .bind(doc_type.as_str())
        .bind(sqlx::types::Json(json!(buyer)))
        .bind(sqlx::types::Json(json!(seller)))
        .bind(&body)
        .bind(generated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    /// Generate a document for every finance deal, serially, sleeping
    /// between records so a bulk run cannot monopolize the pool.
    pub async fn generate_all(&self, doc_type: DocumentType) -> Result<BatchReport, DocumentError> {
        let deal_ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM finance_deals ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        let delay = std::time::Duration::from_millis(config::config().documents.batch_delay_ms);
        let mut report = BatchReport {
            examined: deal_ids.len(),
            ..Default::default()
        };

        for (i, (deal_id,)) in deal_ids.iter().enumerate() {
            match self.generate(*deal_id, doc_type).await {
                Ok(_) => report.generated += 1,
                Err(e) => {
                    tracing::warn!("document generation failed for deal {}: {}", deal_id, e);
                    report.failed.push(BatchFailure {
                        deal_id: *deal_id,
                        reason: e.to_string(),
                    });
                }
            }
            if i + 1 < deal_ids.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(report)
    }

    pub async fn list(&self, deal_id: Option<Uuid>) -> Result<Vec<Document>, DocumentError> {
        let documents = match deal_id {
            Some(id) => {
                sqlx::query_as::<_, Document>(
                    "SELECT * FROM documents WHERE deal_id = $1 ORDER BY generated_at DESC",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Document>(
                    "SELECT * FROM documents ORDER BY generated_at DESC LIMIT 200",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(documents)
    }

    pub async fn get(&self, id: Uuid) -> Result<Document, DocumentError> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DocumentError::DocumentNotFound(id))
    }

    /// Resolve the artifact body plus a download filename
    pub async fn download(&self, id: Uuid) -> Result<(String, String), DocumentError> {
        let document = self.get(id).await?;
        let filename = format!(
            "{}-{}.txt",
            document.doc_type,
            document.vin.as_deref().unwrap_or("no-vin")
        );
        Ok((filename, document.body))
    }
}
