// API request handlers

use axum::{body::Bytes, extract::State, response::Json};
use serde_json::{json, Value};

use super::AppState;
use crate::error::ProxyError;
use crate::proxy::openai::CompletionResponse;

// Root endpoint
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "AI Proxy Service is running"
    }))
}

// Body is taken raw so an unavailable client answers 503 whatever was sent
pub async fn chat_completions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CompletionResponse>, ProxyError> {
    let Some(proxy) = state.proxy.as_ref() else {
        tracing::warn!("Rejecting chat completion: provider client not initialized");
        return Err(ProxyError::Unavailable);
    };

    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Chat completion failed: {}", e);
        ProxyError::Completion(e.to_string())
    })?;

    let response = proxy.complete(raw).await?;
    Ok(Json(response))
}
