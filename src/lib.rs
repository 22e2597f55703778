// Azure Chat Proxy - OpenAI-compatible gateway for Azure AI Inference

pub mod api;
pub mod config;
pub mod error;
pub mod proxy;

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use api::{create_router, AppState};
pub use error::ProxyError;
pub use proxy::ChatProxy;

/// Boot the proxy: logging, configuration, provider client, HTTP server.
///
/// A provider client that cannot be built does not stop the server; it keeps
/// serving and answers completion requests with 503 instead.
pub async fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::load()?;

    let proxy = match build_proxy(&config) {
        Ok(proxy) => Some(Arc::new(proxy)),
        Err(e) => {
            tracing::warn!("Failed to initialize Azure inference client: {}", e);
            None
        }
    };

    tracing::info!("Starting API server...");
    api::start_server(&config, AppState { proxy }).await
}

fn build_proxy(config: &config::AppConfig) -> Result<ChatProxy, ProxyError> {
    let settings = config::AzureSettings::from_env()?;
    let client = api::azure::AzureInferenceClient::new(&settings);
    Ok(ChatProxy::new(Arc::new(client), config.default_model.clone()))
}
