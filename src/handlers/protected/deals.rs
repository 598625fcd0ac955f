use axum::extract::{Path, Query};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::deals::{DealInput, DealService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub stage: String,
    pub priority: Option<String>,
}

/// GET /api/deals - List finance deals, newest first
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let service = DealService::new().await?;
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);
    let deals = service.list(limit, offset).await?;
    Ok(ApiResponse::success(json!(deals)))
}

/// GET /api/deals/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = DealService::new().await?;
    let deal = service.get(id).await?;
    Ok(ApiResponse::success(json!(deal)))
}

/// POST /api/deals - Deal intake. Historical stage/priority spellings are
/// accepted and stored canonical.
pub async fn create(Json(payload): Json<DealInput>) -> ApiResult<Value> {
    let service = DealService::new().await?;
    let deal = service.create(payload).await?;
    Ok(ApiResponse::created(json!(deal)))
}

/// PUT /api/deals/:id - Partial update; absent fields keep their values
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<DealInput>) -> ApiResult<Value> {
    let service = DealService::new().await?;
    let deal = service.update(id, payload).await?;
    Ok(ApiResponse::success(json!(deal)))
}

/// DELETE /api/deals/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<()> {
    let service = DealService::new().await?;
    service.delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// PATCH /api/deals/:id/stage - Move a deal through the finance workflow
pub async fn set_stage(
    Path(id): Path<Uuid>,
    Json(payload): Json<StageRequest>,
) -> ApiResult<Value> {
    let service = DealService::new().await?;
    let deal = service
        .set_stage(id, &payload.stage, payload.priority.as_deref())
        .await?;
    Ok(ApiResponse::success(json!(deal)))
}
