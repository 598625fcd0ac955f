use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::DocumentType;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::documents::DocumentService;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub doc_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DocListQuery {
    pub deal_id: Option<Uuid>,
}

fn parse_doc_type(raw: &str) -> Result<DocumentType, ApiError> {
    match DocumentType::parse(raw) {
        Some(DocumentType::SellerUpload) | None => Err(ApiError::bad_request(format!(
            "doc_type must be 'bill-of-sale' or 'title-reassignment', got '{}'",
            raw
        ))),
        Some(t) => Ok(t),
    }
}

/// POST /api/deals/:id/documents - Generate one legal document.
/// Refuses with 422 when a party cannot be resolved from the deal data.
pub async fn generate(
    Path(deal_id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> ApiResult<Value> {
    let doc_type = parse_doc_type(&payload.doc_type)?;
    let service = DocumentService::new().await?;
    let document = service.generate(deal_id, doc_type).await?;
    Ok(ApiResponse::created(json!(document)))
}

/// POST /api/documents/generate-all - Batch generation across every deal,
/// throttled with the configured inter-record delay
pub async fn generate_all(Json(payload): Json<GenerateRequest>) -> ApiResult<Value> {
    let doc_type = parse_doc_type(&payload.doc_type)?;
    let service = DocumentService::new().await?;
    let report = service.generate_all(doc_type).await?;
    Ok(ApiResponse::success(json!(report)))
}

/// GET /api/documents?deal_id= - List stored documents
pub async fn list(Query(query): Query<DocListQuery>) -> ApiResult<Value> {
    let service = DocumentService::new().await?;
    let documents = service.list(query.deal_id).await?;
    Ok(ApiResponse::success(json!(documents)))
}

/// GET /api/documents/:id/download - Serve the stored artifact body
pub async fn download(Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let service = DocumentService::new().await?;
    let (filename, body) = service.download(id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
