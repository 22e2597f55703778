// HTTP API Server module

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::proxy::ChatProxy;

pub mod azure;
mod handlers;

/// Shared by every handler. `proxy` is `None` when the provider client could
/// not be built at startup; completion requests then get a 503.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Option<Arc<ChatProxy>>,
}

impl AppState {
    pub fn new(proxy: ChatProxy) -> Self {
        Self {
            proxy: Some(Arc::new(proxy)),
        }
    }

    pub fn unavailable() -> Self {
        Self { proxy: None }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: &AppConfig, state: AppState) -> Result<()> {
    let addr = config.bind_addr();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
