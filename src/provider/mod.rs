//! Uniform handler surface over chat-completion providers.

pub mod openai;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::chat::{ChatMessage, TransportError};

pub use openai::{OpenAiHandler, SupportedModel};

/// Boxed future used by [`ModelHandler`] methods.
pub type HandlerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors surfaced by a handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Construction was aborted because the options did not validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The provider call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The model a handler will address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Provider model identifier.
    pub id: String,
}

/// Common operations every provider handler offers.
pub trait ModelHandler: Send + Sync {
    /// Sends `messages`, preceded by `system_prompt` when it is not blank,
    /// and returns the text of the first reply.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Transport`] when the provider call fails.
    fn invoke<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        system_prompt: Option<&'a str>,
    ) -> HandlerFuture<'a, Result<String, HandlerError>>;

    /// The model requests are sent to.
    fn get_model(&self) -> ModelInfo;

    /// Cheap credential check; `false` on any failure.
    fn is_valid(&self) -> HandlerFuture<'_, bool>;
}
