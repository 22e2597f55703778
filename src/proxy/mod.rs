// Proxy module - translate, forward, translate back

pub mod openai;
pub mod translator;

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::api::azure::ChatCompletions;
use crate::error::ProxyError;
use openai::{CompletionRequest, CompletionResponse};

/// The completion pipeline: one provider handle plus the fallback model.
pub struct ChatProxy {
    provider: Arc<dyn ChatCompletions>,
    default_model: String,
}

impl ChatProxy {
    pub fn new(provider: Arc<dyn ChatCompletions>, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            default_model: default_model.into(),
        }
    }

    /// Process a chat completion request.
    ///
    /// Every failure, from reading the body through to reshaping the reply,
    /// surfaces as `ProxyError::Completion` carrying the cause's text.
    pub async fn complete(&self, raw: Value) -> Result<CompletionResponse, ProxyError> {
        self.try_complete(raw).await.map_err(|e| {
            tracing::error!("Chat completion failed: {:#}", e);
            ProxyError::Completion(format!("{:#}", e))
        })
    }

    async fn try_complete(&self, raw: Value) -> Result<CompletionResponse> {
        let request: CompletionRequest = serde_json::from_value(raw)?;
        let native = translator::translate_request(&request, &self.default_model)?;

        tracing::debug!(
            model = %native.model,
            messages = native.messages.len(),
            dropped = request.messages.len() - native.messages.len(),
            "Forwarding chat completion"
        );

        let response = self.provider.complete(&native).await?;
        translator::translate_response(&response, &native.model)
    }
}
