//! Handler for the OpenAI chat-completion API.

use tracing::{debug, error, info};

use super::{HandlerError, HandlerFuture, ModelHandler, ModelInfo};
use crate::adapters::live::LiveChatTransport;
use crate::config::{ConfigOptions, ProviderConfig};
use crate::ports::chat::{ChatCompletionRequest, ChatMessage, ChatTransport};

/// Models this handler knows how to address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SupportedModel {
    /// `gpt-4o`
    #[default]
    Gpt4o,
    /// `gpt-4o-mini`
    Gpt4oMini,
}

impl SupportedModel {
    /// Every supported model.
    pub const ALL: [Self; 2] = [Self::Gpt4o, Self::Gpt4oMini];

    /// Provider identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
        }
    }

    /// Exact-match lookup against [`Self::ALL`].
    #[must_use]
    pub fn lookup(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.id() == id)
    }
}

const CHECK_PROMPT: &str = "Test";

/// OpenAI handler owning one transport for its whole lifetime.
pub struct OpenAiHandler {
    config: ProviderConfig,
    transport: Box<dyn ChatTransport>,
}

impl std::fmt::Debug for OpenAiHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiHandler")
            .field("model_id", &self.config.model_id)
            .field("max_retries", &self.config.max_retries)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl OpenAiHandler {
    /// Validates `options` and builds a live HTTP transport from them.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Config`] when the options are invalid; no
    /// handler is produced in that case.
    pub fn new(options: &ConfigOptions) -> Result<Self, HandlerError> {
        let config = ProviderConfig::parse(options)?;
        let transport = LiveChatTransport::new(config.api_key.clone(), config.max_retries);
        info!(
            model_id = %config.model_id,
            max_retries = config.max_retries,
            "created OpenAI client"
        );
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Builds a handler over an already-parsed config and any transport.
    #[must_use]
    pub fn with_transport(config: ProviderConfig, transport: Box<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    /// The parsed configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn model_id(&self) -> &'static str {
        SupportedModel::lookup(&self.config.model_id).unwrap_or_default().id()
    }
}

/// Optional system message followed by the caller's messages in order.
fn compose_messages(messages: &[ChatMessage], system_prompt: Option<&str>) -> Vec<ChatMessage> {
    let system_prompt = system_prompt.map(str::trim).unwrap_or_default();
    let mut composed = Vec::with_capacity(messages.len() + 1);
    if !system_prompt.is_empty() {
        composed.push(ChatMessage::system(system_prompt));
    }
    composed.extend_from_slice(messages);
    composed
}

impl ModelHandler for OpenAiHandler {
    fn invoke<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        system_prompt: Option<&'a str>,
    ) -> HandlerFuture<'a, Result<String, HandlerError>> {
        let request =
            ChatCompletionRequest::new(self.model_id(), compose_messages(messages, system_prompt));
        Box::pin(async move {
            let response = self.transport.create(&request).await?;
            debug!(choices = response.choices.len(), "invoke completed");
            Ok(response.first_text().to_string())
        })
    }

    fn get_model(&self) -> ModelInfo {
        ModelInfo { id: self.model_id().to_string() }
    }

    fn is_valid(&self) -> HandlerFuture<'_, bool> {
        let mut request =
            ChatCompletionRequest::new(self.model_id(), vec![ChatMessage::user(CHECK_PROMPT)]);
        request.max_tokens = Some(1);
        request.temperature = Some(0.0);
        Box::pin(async move {
            match self.transport.create(&request).await {
                Ok(_) => true,
                Err(e) => {
                    error!(error = %e, "error validating OpenAI credentials");
                    false
                }
            }
        })
    }
}
