//! HTTP handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::responses::PropertyListResponse;
use property_domain::CacheMetrics;
use property_persistence::PropertyRepository;

/// `GET /properties/` - every listing, served through the snapshot cache
pub async fn list_properties(State(ctx): State<ApiContext>) -> ApiResult<Json<PropertyListResponse>> {
    let properties = ctx.properties.fetch_all().await?;
    Ok(Json(PropertyListResponse::from_properties(&properties)))
}

/// `GET /cache/metrics` - Redis keyspace hit ratio; always 200, errors are in the body
pub async fn cache_metrics(State(ctx): State<ApiContext>) -> Json<CacheMetrics> {
    Json(ctx.metrics.get_cache_metrics().await)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}
