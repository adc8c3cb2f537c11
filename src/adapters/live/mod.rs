//! Live adapters that talk to real external services.

pub mod chat;

pub use chat::LiveChatTransport;
