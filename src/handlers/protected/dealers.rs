use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dealers::{DealerInput, DealerService};

/// GET /api/dealers - Full dealer book, alphabetical
pub async fn list() -> ApiResult<Value> {
    let service = DealerService::new().await?;
    let dealers = service.list().await?;
    Ok(ApiResponse::success(json!(dealers)))
}

/// GET /api/dealers/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let service = DealerService::new().await?;
    let dealer = service.get(id).await?;
    Ok(ApiResponse::success(json!(dealer)))
}

/// POST /api/dealers
pub async fn create(Json(payload): Json<DealerInput>) -> ApiResult<Value> {
    let service = DealerService::new().await?;
    let dealer = service.create(payload).await?;
    Ok(ApiResponse::created(json!(dealer)))
}

/// PUT /api/dealers/:id
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<DealerInput>) -> ApiResult<Value> {
    let service = DealerService::new().await?;
    let dealer = service.update(id, payload).await?;
    Ok(ApiResponse::success(json!(dealer)))
}

/// DELETE /api/dealers/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<()> {
    let service = DealerService::new().await?;
    service.delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/dealers/recompute - Rebuild total_deals/total_volume from
/// the finance deals table
pub async fn recompute() -> ApiResult<Value> {
    let service = DealerService::new().await?;
    let touched = service.recompute_metrics().await?;
    Ok(ApiResponse::success(json!({ "dealers_updated": touched })))
}
