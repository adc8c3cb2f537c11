//! Recording adapters that capture interactions into cassettes.

pub mod chat;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::CassetteRecorder;

pub use chat::RecordingChatTransport;

/// Port name used for chat-completion exchanges.
pub(crate) const CHAT_PORT: &str = "chat";

/// Records a fallible exchange using the `{"ok": ...}` / `{"err": "..."}` convention
/// understood by `replaying::replay_result`.
///
/// Serialisation failures are logged and the exchange is skipped; recording
/// never changes the outcome seen by the caller.
pub(crate) fn record_result<I, T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    let input = match serde_json::to_value(input) {
        Ok(value) => value,
        Err(e) => {
            warn!(port, method, error = %e, "skipping recording: input not serialisable");
            return;
        }
    };
    let output = match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => serde_json::json!({ "ok": value }),
            Err(e) => {
                warn!(port, method, error = %e, "skipping recording: output not serialisable");
                return;
            }
        },
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => warn!(port, method, "skipping recording: recorder lock poisoned"),
    }
}
