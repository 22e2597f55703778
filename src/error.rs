//! Proxy errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Required provider settings were absent at startup. Names the missing settings.
    #[error("Azure OpenAI configuration is missing: {0}")]
    Config(String),

    /// A request arrived while the provider client was never constructed.
    #[error("Azure OpenAI client is not initialized")]
    Unavailable,

    /// Any failure while translating, calling the provider or reshaping its reply.
    #[error("Error in chat completion: {0}")]
    Completion(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Config(_) | ProxyError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ProxyError::Config(_) => "server_error",
            ProxyError::Unavailable => "service_unavailable",
            ProxyError::Completion(_) => "api_error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // `detail` mirrors the message for clients that read the plain error shape
        let body = Json(json!({
            "error": {
                "message": message,
                "type": self.error_type(),
                "code": status.as_u16(),
            },
            "detail": message,
        }));

        (status, body).into_response()
    }
}
