// Request/Response translator between the OpenAI and Azure inference formats

use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

use super::openai::{
    ChatMessage, ChatRole, CompletionChoice, CompletionRequest, CompletionResponse,
    InboundMessage, Usage, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};
use crate::api::azure::{NativeMessage, NativeRequest, NativeResponse};

/// Convert OpenAI chat messages to native messages.
///
/// Only system and user turns are forwarded; assistant turns and any other
/// role are dropped without their content being read. Order is preserved.
pub fn convert_messages(messages: &[InboundMessage]) -> Result<Vec<NativeMessage>> {
    let mut converted = Vec::new();
    for msg in messages {
        match msg.role {
            ChatRole::System => converted.push(NativeMessage::system(text_content(msg)?)),
            ChatRole::User => converted.push(NativeMessage::user(text_content(msg)?)),
            ChatRole::Assistant | ChatRole::Other(_) => {}
        }
    }
    Ok(converted)
}

fn text_content(msg: &InboundMessage) -> Result<&str> {
    msg.content.as_str().ok_or_else(|| {
        anyhow!(
            "{} message content must be a string, got {}",
            String::from(msg.role.clone()),
            msg.content
        )
    })
}

/// Translate an OpenAI request into the native request, filling defaults.
pub fn translate_request(request: &CompletionRequest, default_model: &str) -> Result<NativeRequest> {
    Ok(NativeRequest {
        messages: convert_messages(&request.messages)?,
        model: request
            .deployment_id
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        top_p: request.top_p.unwrap_or(DEFAULT_TOP_P),
    })
}

/// Convert a native response to OpenAI format.
///
/// `created`, `finish_reason` and usage are fixed (0, "stop", zeros) whatever
/// the provider reported.
pub fn translate_response(response: &NativeResponse, model: &str) -> Result<CompletionResponse> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| anyhow!("provider response contained no choices"))?;

    let content = choice.message.content.clone().unwrap_or_default();

    Ok(CompletionResponse {
        id: format!("chatcmpl-{}", response_digest(response)?),
        object: "chat.completion".to_string(),
        created: 0,
        model: model.to_string(),
        choices: vec![CompletionChoice {
            index: 0,
            message: ChatMessage::assistant(content),
            finish_reason: "stop".to_string(),
        }],
        usage: Usage::default(),
    })
}

// First 8 bytes of the SHA-256 of the serialized response, as hex.
fn response_digest(response: &NativeResponse) -> Result<String> {
    let serialized = serde_json::to_string(response)?;
    let digest = Sha256::digest(serialized.as_bytes());
    Ok(digest[..8].iter().map(|b| format!("{:02x}", b)).collect())
}
