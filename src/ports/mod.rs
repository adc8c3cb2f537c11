//! Port traits defining external boundaries.
//!
//! Implementations live in `src/adapters/`.

pub mod chat;

pub use chat::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatFuture, ChatMessage,
    ChatTransport, ChoiceMessage, Role, TransportError,
};
