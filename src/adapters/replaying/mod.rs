//! Replaying adapters that serve recorded interactions.

pub mod chat;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::CassetteReplayer;
use crate::ports::chat::TransportError;

pub use chat::ReplayingChatTransport;

/// Pulls the next recorded output for `port`/`method`.
///
/// A missing or exhausted stream is reported as an error output so the
/// caller sees a transport failure instead of a panic.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, TransportError> {
    let mut guard =
        replayer.lock().map_err(|_| TransportError::Replayed("replayer lock poisoned".into()))?;
    let output = guard.next_interaction(port, method).map(|i| i.output.clone());
    output.ok_or_else(|| {
        TransportError::Replayed(format!("cassette exhausted for {port}::{method}"))
    })
}

/// Decodes an `{"ok": ...}` / `{"err": "..."}` output into a result.
pub(crate) fn replay_result<T>(
    output: Result<serde_json::Value, TransportError>,
) -> Result<T, TransportError>
where
    T: DeserializeOwned,
{
    let output = output?;
    if let Some(ok) = output.get("ok") {
        return serde_json::from_value(ok.clone())
            .map_err(|e| TransportError::Decode(format!("recorded ok value: {e}")));
    }
    match output.get("err") {
        Some(serde_json::Value::String(message)) => Err(TransportError::Replayed(message.clone())),
        Some(other) => Err(TransportError::Replayed(other.to_string())),
        None => Err(TransportError::Decode(format!(
            "recorded output has neither ok nor err: {output}"
        ))),
    }
}
