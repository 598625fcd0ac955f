use axum::extract::{Path, Query};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::sales::SalesService;

use super::deals::ListQuery;

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub stage: String,
    pub note: Option<String>,
}

/// GET /api/sales - List sales deals, newest first
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let service = SalesService::new().await?;
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);
    let deals = service.list(limit, offset).await?;
    Ok(ApiResponse::success(json!(deals)))
}

/// GET /api/sales/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = SalesService::new().await?;
    let deal = service.get(id).await?;
    Ok(ApiResponse::success(json!(deal)))
}

/// POST /api/sales/:id/stage - Pipeline transition; appends to the
/// stage history log
pub async fn transition(
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Value> {
    let service = SalesService::new().await?;
    let deal = service.transition(id, &payload.stage, payload.note).await?;
    Ok(ApiResponse::success(json!(deal)))
}
