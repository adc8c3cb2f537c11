//! Service context deciding how the chat transport is wired.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::LiveChatTransport;
use crate::adapters::recording::RecordingChatTransport;
use crate::adapters::replaying::ReplayingChatTransport;
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::config::{ConfigOptions, ProviderConfig};
use crate::ports::chat::ChatTransport;
use crate::provider::{HandlerError, OpenAiHandler};

/// Environment variable naming a cassette file to record chat exchanges into.
pub const RECORD_ENV: &str = "REQFORGE_RECORD";
/// Environment variable naming a cassette file to replay chat exchanges from.
pub const REPLAY_ENV: &str = "REQFORGE_REPLAY";

enum Mode {
    Live,
    Recording(Arc<Mutex<CassetteRecorder>>),
    Replaying(Arc<Mutex<CassetteReplayer>>),
}

/// Chooses between live, recording and replaying transports.
///
/// A recording context writes its cassette when dropped.
pub struct ServiceContext {
    mode: Mode,
}

impl ServiceContext {
    /// Talks to the real provider.
    #[must_use]
    pub fn live() -> Self {
        Self { mode: Mode::Live }
    }

    /// Talks to the real provider and records every exchange to `path`.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = CassetteRecorder::new(path, "reqforge-session", commit_hash());
        Self { mode: Mode::Recording(Arc::new(Mutex::new(recorder))) }
    }

    /// Serves chat exchanges from an in-memory cassette.
    #[must_use]
    pub fn replaying(cassette: &Cassette) -> Self {
        Self { mode: Mode::Replaying(Arc::new(Mutex::new(CassetteReplayer::new(cassette)))) }
    }

    /// Serves chat exchanges from the cassette file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying_from(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path).map_err(|e| e.to_string())?;
        Ok(Self::replaying(&cassette))
    }

    /// Picks the mode from [`RECORD_ENV`] / [`REPLAY_ENV`]; replay wins when both are set.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_env() -> Result<Self, String> {
        if let Some(path) = non_empty_var(REPLAY_ENV) {
            info!(cassette = %path, "replaying chat exchanges");
            return Self::replaying_from(Path::new(&path));
        }
        if let Some(path) = non_empty_var(RECORD_ENV) {
            info!(cassette = %path, "recording chat exchanges");
            return Ok(Self::recording(Path::new(&path)));
        }
        Ok(Self::live())
    }

    /// Transport matching this context's mode.
    #[must_use]
    pub fn chat_transport(&self, config: &ProviderConfig) -> Box<dyn ChatTransport> {
        match &self.mode {
            Mode::Live => {
                Box::new(LiveChatTransport::new(config.api_key.clone(), config.max_retries))
            }
            Mode::Recording(recorder) => Box::new(RecordingChatTransport::new(
                Box::new(LiveChatTransport::new(config.api_key.clone(), config.max_retries)),
                Arc::clone(recorder),
            )),
            Mode::Replaying(replayer) => {
                Box::new(ReplayingChatTransport::new(Arc::clone(replayer)))
            }
        }
    }

    /// Builds an OpenAI handler over this context's transport.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Config`] when `options` do not validate.
    pub fn openai_handler(&self, options: &ConfigOptions) -> Result<OpenAiHandler, HandlerError> {
        if matches!(self.mode, Mode::Live) {
            return OpenAiHandler::new(options);
        }
        let config = ProviderConfig::parse(options)?;
        let transport = self.chat_transport(&config);
        Ok(OpenAiHandler::with_transport(config, transport))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Mode::Recording(recorder) = &self.mode else { return };
        let Ok(recorder) = recorder.lock() else {
            warn!("recorder lock poisoned; cassette not written");
            return;
        };
        match recorder.write() {
            Ok(path) => {
                info!(
                    cassette = %path.display(),
                    interactions = recorder.len(),
                    "cassette written"
                );
            }
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Revision of the working tree, or `unknown` outside a git checkout.
fn commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    hash.unwrap_or_else(|| {
        warn!("could not read git commit hash; recording it as 'unknown'");
        "unknown".to_string()
    })
}
