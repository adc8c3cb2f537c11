//! Chat-completion port: the single network boundary of the provider adapter.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future returned by [`ChatTransport::create`], keeping the trait dyn-compatible.
pub type ChatFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ChatCompletionResponse, TransportError>> + Send + 'a>>;

/// Failures reported by a chat transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("chat completion request failed: {0}")]
    Request(String),
    /// The provider answered with a non-success status.
    #[error("chat completion API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode chat completion response: {0}")]
    Decode(String),
    /// A failure served from a cassette, or a cassette that ran dry.
    #[error("replayed chat completion failure: {0}")]
    Replayed(String),
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation.
    System,
    /// End-user input.
    User,
    /// Earlier model output.
    Assistant,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Builds a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Builds an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of a `POST /chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Output token cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Always `false`; streaming is not supported.
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// A non-streaming request with provider defaults for everything else.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            stream: false,
        }
    }
}

/// Message part of a completion choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text; providers send `null` for tool-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    #[serde(default)]
    pub message: ChoiceMessage,
}

/// Decoded `/chat/completions` response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions, possibly empty.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, or `""` when there is none.
    #[must_use]
    pub fn first_text(&self) -> &str {
        self.choices.first().and_then(|c| c.message.content.as_deref()).unwrap_or_default()
    }
}

/// Sends chat-completion requests to a provider.
pub trait ChatTransport: Send + Sync {
    /// Performs one completion call.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for network, HTTP or decoding failures.
    fn create(&self, request: &ChatCompletionRequest) -> ChatFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_unset_sampling_fields() {
        let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn response_tolerates_extra_fields_and_null_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.first_text(), "");
    }

    #[test]
    fn first_text_uses_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"content": "first"}},
                {"message": {"content": "second"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), "first");
    }
}
