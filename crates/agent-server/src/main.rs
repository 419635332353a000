//! Agent Studio HTTP Server
//!
//! Axum-based server for the chat API, health probe and the static
//! Leptos frontend.

mod config;
mod handlers;
mod service;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::Catalog;
use agent_runtime::{AgentInvoker, RuntimeConfig};

use crate::config::ServerConfig;
use crate::handlers::{catalog_handler, chat_handler, health_check};
use crate::state::AppState;

/// Routes, middleware and static file fallback
pub fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat_handler))
        .route("/api/catalog", get(catalog_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before reading RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();
    let runtime_config = RuntimeConfig::from_env();

    let invoker = AgentInvoker::from_config(&runtime_config);
    let providers = invoker.provider_statuses();
    let search_configured = invoker.search_configured();

    for provider in &providers {
        if provider.configured {
            tracing::info!("✓ Provider {} configured", provider.name);
        } else {
            tracing::warn!("⚠ Provider {} has no API key - requests will fail", provider.name);
        }
    }
    if !search_configured {
        tracing::warn!("⚠ TAVILY_API_KEY not set - web search disabled");
    }

    let mut catalog = Catalog::builtin();
    catalog.retain_providers(|name| providers.iter().any(|p| p.name == name));
    tracing::info!("Allow-listed models: {}", catalog.allowed_models().collect::<Vec<_>>().join(", "));

    let state = AppState::new(Arc::new(invoker), catalog, providers, search_configured);
    let app = router(state, &server_config.static_dir);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 Agent Studio running on http://{}", server_config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  POST /chat        - Run one agent turn");
    tracing::info!("  GET  /api/catalog - Providers, models, templates");

    axum::serve(listener, app).await?;

    Ok(())
}
