//! # Property Listings API Server
//!
//! Binary entry point for the property listings HTTP service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_api::{build_router, ApiContextBuilder, Config};
use property_persistence::{
    CacheClient, CacheConfig, CacheMetricsReader, ScyllaClient, ScyllaConfig,
    ScyllaPropertyRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(
        version = property_api::VERSION,
        "Starting Property Listings API"
    );

    // Initialize ScyllaDB client
    tracing::info!(
        hosts = ?config.scylla.hosts,
        keyspace = %config.scylla.keyspace,
        "Connecting to ScyllaDB"
    );

    let scylla_config = ScyllaConfig {
        hosts: config.scylla.hosts.clone(),
        keyspace: config.scylla.keyspace.clone(),
        username: config.scylla.username.clone(),
        password: config.scylla.password.clone(),
    };

    let scylla = Arc::new(ScyllaClient::new(scylla_config).await?);
    tracing::info!("ScyllaDB connected");

    let repository = ScyllaPropertyRepository::new(scylla);
    if config.scylla.ensure_schema {
        repository.ensure_schema().await?;
    }

    // Initialize Redis cache
    tracing::info!(url = %config.redis.url, "Connecting to Redis");

    let cache_config = CacheConfig {
        url: config.redis.url.clone(),
        key_prefix: config.redis.key_prefix.clone(),
        version: config.redis.key_version,
    };

    let cache = CacheClient::new(cache_config).await?;
    tracing::info!("Redis connected");

    let metrics = CacheMetricsReader::new(config.redis.url.clone(), config.redis.metrics_timeout);

    // Build API context
    let api_ctx = ApiContextBuilder::new()
        .with_repository(Arc::new(repository))
        .with_cache(Arc::new(cache))
        .with_metrics(metrics)
        .with_policy(config.cache)
        .build()
        .map_err(anyhow::Error::msg)?;

    tracing::info!(
        properties_ttl_secs = config.cache.properties_ttl.as_secs(),
        page_ttl_secs = config.cache.page_ttl.as_secs(),
        read_strategy = ?config.cache.read_strategy,
        coalesce_misses = config.cache.coalesce_misses,
        "Cache policy applied"
    );

    // Build router
    let app = build_router(api_ctx, &config.cors_origins);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Property listings available at http://{}/properties/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
