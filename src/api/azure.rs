// Azure AI Inference client for proxying chat completions

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AzureSettings;

const API_VERSION: &str = "2024-05-01-preview";

/// Roles the inference endpoint accepts from this proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeMessage {
    pub role: NativeRole,
    pub content: String,
}

impl NativeMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: NativeRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: NativeRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeRequest {
    pub messages: Vec<NativeMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<NativeChoice>,
    #[serde(default)]
    pub usage: Option<NativeUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeChoice {
    #[serde(default)]
    pub index: u32,
    pub message: NativeReply,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeReply {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// A chat completion backend.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    async fn complete(&self, request: &NativeRequest) -> Result<NativeResponse>;
}

/// Read-only after construction; clone or share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AzureInferenceClient {
    api_key: String,
    endpoint: String,
    http_client: reqwest::Client,
}

impl AzureInferenceClient {
    pub fn new(settings: &AzureSettings) -> Self {
        let mut endpoint = settings.endpoint.clone();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self {
            api_key: settings.api_key.clone(),
            endpoint,
            http_client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions?api-version={}", self.endpoint, API_VERSION)
    }
}

#[async_trait]
impl ChatCompletions for AzureInferenceClient {
    async fn complete(&self, request: &NativeRequest) -> Result<NativeResponse> {
        let response = self
            .http_client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Azure inference request failed: {} {}", status, body));
        }

        let body: NativeResponse = response.json().await?;
        Ok(body)
    }
}
