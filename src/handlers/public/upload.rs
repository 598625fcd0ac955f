use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tokens::TokenService;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
}

/// POST /upload/:token - Seller-facing upload, authenticated by the
/// capability token alone. Burns one attempt per call.
pub async fn upload_post(
    Path(token): Path<String>,
    Json(payload): Json<UploadRequest>,
) -> ApiResult<Value> {
    if payload.file_name.trim().is_empty() {
        return Err(ApiError::validation_error("file_name is required", None));
    }

    let service = TokenService::new().await.map_err(ApiError::from)?;
    let record = service.consume(&token, payload.file_name.trim()).await?;

    let remaining = (record.max_upload_attempts - record.upload_attempts).max(0);
    Ok(ApiResponse::success(json!({
        "deal_id": record.deal_id,
        "uploaded_files": record.uploaded_files,
        "attempts_remaining": remaining,
        "expires_at": record.expires_at,
    })))
}
