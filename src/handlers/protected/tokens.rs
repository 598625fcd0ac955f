use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tokens::TokenService;

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub seller_email: String,
}

/// POST /api/deals/:id/upload-token - Issue a seller upload token.
/// The secret appears in this response only; the database keeps a digest.
pub async fn issue(
    Path(deal_id): Path<Uuid>,
    Json(payload): Json<IssueRequest>,
) -> ApiResult<Value> {
    if !payload.seller_email.contains('@') {
        return Err(ApiError::validation_error("seller_email is invalid", None));
    }

    let service = TokenService::new().await?;
    let issued = service.issue(deal_id, payload.seller_email.trim()).await?;
    Ok(ApiResponse::created(json!(issued)))
}

/// GET /api/deals/:id/upload-tokens - Tokens issued for a deal
pub async fn list_for_deal(Path(deal_id): Path<Uuid>) -> ApiResult<Value> {
    let service = TokenService::new().await?;
    let tokens = service.list_for_deal(deal_id).await?;
    Ok(ApiResponse::success(json!(tokens)))
}

/// DELETE /api/upload-tokens/:id - Revoke a token early
pub async fn deactivate(Path(id): Path<Uuid>) -> ApiResult<()> {
    let service = TokenService::new().await?;
    service.deactivate(id).await?;
    Ok(ApiResponse::<()>::no_content())
}
