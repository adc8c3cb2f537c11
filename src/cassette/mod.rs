//! Cassettes: recorded port exchanges used for deterministic replay.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, CassetteError, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;
