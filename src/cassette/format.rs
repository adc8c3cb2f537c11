//! On-disk cassette layout for recorded port exchanges.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing cassette files.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette I/O failed for {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The cassette content is not valid YAML for [`Cassette`].
    #[error("cassette {path} is not valid YAML: {source}")]
    Yaml {
        /// File that was being parsed or written.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// One exchange with a port, as seen from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the cassette, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `"chat"`.
    pub port: String,
    /// Method invoked on the port, e.g. `"create"`.
    pub method: String,
    /// Request sent to the port.
    pub input: serde_json::Value,
    /// Outcome, `{"ok": ...}` or `{"err": "..."}` for fallible methods.
    pub output: serde_json::Value,
}

/// An ordered list of recorded interactions plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// Recording time.
    pub recorded_at: DateTime<Utc>,
    /// Source revision the recording was taken from.
    pub commit: String,
    /// Interactions in recording order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a cassette file.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError`] when the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Io { path: display.clone(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CassetteError::Yaml { path: display, source })
    }

    /// Serialises the cassette as YAML into `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError`] when serialisation or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), CassetteError> {
        let display = path.display().to_string();
        let yaml = serde_yaml::to_string(self)
            .map_err(|source| CassetteError::Yaml { path: display.clone(), source })?;
        std::fs::write(path, yaml).map_err(|source| CassetteError::Io { path: display, source })
    }
}
