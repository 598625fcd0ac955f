use axum::extract::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::sync::SyncService;

/// GET /api/sync/status - Collection counts plus the latest run
pub async fn status() -> ApiResult<Value> {
    let service = SyncService::new().await?;
    let status = service.status().await?;
    Ok(ApiResponse::success(json!(status)))
}

/// POST /api/sync/run - Materialize missing sales deals now
pub async fn run(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let service = SyncService::new().await?;
    let run = service.run(&auth_user.email).await?;
    Ok(ApiResponse::success(json!(run)))
}
