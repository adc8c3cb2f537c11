//! Live adapter for the `ChatTransport` port using an OpenAI-compatible HTTP API.

use std::time::Duration;

use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ports::chat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatFuture, ChatTransport, TransportError,
};

/// Default API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Environment variable overriding [`OPENAI_API_BASE`].
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Retries performed after the first attempt unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Delay before the first retry; doubles on each further retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
/// Upper bound for the delay between two attempts.
pub const BACKOFF_MAX_INTERVAL: Duration = Duration::from_secs(8);

/// Error envelope returned by the API on failure.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Outcome of one HTTP attempt, before the retry decision.
enum Attempt {
    Done(ChatCompletionResponse),
    Retryable(TransportError),
    Fatal(TransportError),
}

/// Live chat transport holding one HTTP client for its whole lifetime.
#[derive(Debug, Clone)]
pub struct LiveChatTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_retries: u32,
    initial_backoff: Duration,
}

impl LiveChatTransport {
    /// Creates a transport against the default (or env-overridden) base URL.
    #[must_use]
    pub fn new(api_key: Option<String>, max_retries: u32) -> Self {
        let base_url = std::env::var(OPENAI_BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());
        Self::with_base_url(base_url, api_key, max_retries)
    }

    /// Creates a transport against an explicit base URL.
    #[must_use]
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
        max_retries: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key,
            max_retries,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Replaces the delay before the first retry.
    #[must_use]
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Configured retry budget.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Deterministic exponential schedule; the retry count is bounded by
    /// `max_retries`, not by elapsed time.
    fn policy(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(BACKOFF_MAX_INTERVAL)
            .with_max_elapsed_time(None)
            .build()
    }

    async fn attempt(&self, request: &ChatCompletionRequest) -> Attempt {
        let mut builder = self.client.post(self.endpoint()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Retryable(TransportError::Request(e.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Retryable(TransportError::Request(e.to_string())),
        };

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            let error = TransportError::Api { status: status.as_u16(), message };
            return if is_retryable_status(status) {
                Attempt::Retryable(error)
            } else {
                Attempt::Fatal(error)
            };
        }

        match serde_json::from_str::<ChatCompletionResponse>(&body) {
            Ok(parsed) => Attempt::Done(parsed),
            Err(e) => Attempt::Fatal(TransportError::Decode(e.to_string())),
        }
    }
}

/// Statuses worth another attempt: timeouts, conflicts, rate limits, server errors.
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 409 | 429) || status.is_server_error()
}

impl ChatTransport for LiveChatTransport {
    fn create(&self, request: &ChatCompletionRequest) -> ChatFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let request = &request;
            let max_retries = self.max_retries;
            let mut sent = 0u32;

            let result = backoff::future::retry_notify(
                self.policy(),
                || {
                    let retries_left = sent < max_retries;
                    sent += 1;
                    async move {
                        debug!(
                            model = %request.model,
                            messages = request.messages.len(),
                            "sending chat completion"
                        );
                        match self.attempt(request).await {
                            Attempt::Done(response) => Ok(response),
                            Attempt::Retryable(error) if retries_left => {
                                Err(backoff::Error::transient(error))
                            }
                            Attempt::Retryable(error) | Attempt::Fatal(error) => {
                                Err(backoff::Error::permanent(error))
                            }
                        }
                    }
                },
                |error: TransportError, delay: Duration| {
                    warn!(%error, max_retries, ?delay, "retrying chat completion");
                },
            )
            .await;

            if let Ok(response) = &result {
                debug!(choices = response.choices.len(), "chat completion succeeded");
            }
            result
        })
    }
}
