//! # Property Listings API
//!
//! HTTP service exposing property listings from a Redis-cached snapshot.
//!
//! ## Endpoints
//!
//! - `GET /properties/` - all listings as `{"properties": [...], "count": N}`
//! - `GET /cache/metrics` - Redis keyspace hit/miss counters and hit ratio
//! - `GET /health` - liveness probe
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Page cache (15 min TTL)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        CachedPropertyRepository (1 h snapshot TTL)          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Redis Cache         │   │        ScyllaDB              │
//! │  (snapshot, pages)      │   │   (Source of Truth)          │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod page_cache;
pub mod responses;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use context::{ApiContext, ApiContextBuilder};
pub use error::{ApiError, ApiResult};

/// Build the CORS layer; `*` anywhere in the list allows any origin
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_origin(allow_origin)
        .allow_headers(Any)
}

/// Build the Axum router
pub fn build_router(ctx: ApiContext, cors_origins: &[String]) -> Router {
    let properties = get(handlers::list_properties).layer(middleware::from_fn_with_state(
        ctx.clone(),
        page_cache::page_cache,
    ));

    Router::new()
        .route("/properties", properties.clone())
        .route("/properties/", properties)
        .route("/cache/metrics", get(handlers::cache_metrics))
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(|| async { "Property Listings API" }))
        // State and middleware
        .with_state(ctx)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
