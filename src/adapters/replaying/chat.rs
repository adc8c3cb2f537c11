//! Replaying adapter for the `ChatTransport` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::CassetteReplayer;
use crate::ports::chat::{ChatCompletionRequest, ChatFuture, ChatTransport};

/// Serves recorded chat completions from a cassette, ignoring the request.
pub struct ReplayingChatTransport {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingChatTransport {
    /// Creates a transport backed by `replayer`.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ChatTransport for ReplayingChatTransport {
    fn create(&self, _request: &ChatCompletionRequest) -> ChatFuture<'_> {
        let output = next_output(&self.replayer, crate::adapters::recording::CHAT_PORT, "create");
        Box::pin(async move { replay_result(output) })
    }
}
