//! Recording adapter for the `ChatTransport` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::ports::chat::{ChatCompletionRequest, ChatFuture, ChatTransport};

/// Delegates to an inner transport and records every exchange.
pub struct RecordingChatTransport {
    inner: Box<dyn ChatTransport>,
    recorder: Arc<Mutex<crate::cassette::CassetteRecorder>>,
}

impl RecordingChatTransport {
    /// Wraps `inner`, appending each exchange to `recorder`.
    pub fn new(
        inner: Box<dyn ChatTransport>,
        recorder: Arc<Mutex<crate::cassette::CassetteRecorder>>,
    ) -> Self {
        Self { inner, recorder }
    }
}

impl ChatTransport for RecordingChatTransport {
    fn create(&self, request: &ChatCompletionRequest) -> ChatFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.create(&request).await;
            record_result(&self.recorder, super::CHAT_PORT, "create", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingChatTransport;
    use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer, Interaction};
    use crate::ports::chat::{ChatMessage, TransportError};
    use chrono::Utc;
    use serde_json::json;

    fn scripted(outputs: Vec<serde_json::Value>) -> Box<dyn ChatTransport> {
        let interactions = outputs
            .into_iter()
            .enumerate()
            .map(|(seq, output)| Interaction {
                seq: seq as u64,
                port: "chat".into(),
                method: "create".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "inner".into(),
            recorded_at: Utc::now(),
            commit: "x".into(),
            interactions,
        };
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Box::new(ReplayingChatTransport::new(replayer))
    }

    #[tokio::test]
    async fn records_success_and_failure() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("/unused", "rec", "x")));
        let transport = RecordingChatTransport::new(
            scripted(vec![
                json!({"ok": {"choices": [{"message": {"content": "hello"}}]}}),
                json!({"err": "rate limited"}),
            ]),
            Arc::clone(&recorder),
        );

        let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        let first = transport.create(&request).await.unwrap();
        assert_eq!(first.first_text(), "hello");
        let second = transport.create(&request).await.unwrap_err();
        assert!(matches!(second, TransportError::Replayed(_)));

        let guard = recorder.lock().unwrap();
        assert_eq!(guard.len(), 2);
    }
}
