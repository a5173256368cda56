// ABOUTME: Core data models for chat sessions and messages

pub mod chat;
pub mod session;

pub use chat::{ChatMessage, Role};
pub use session::{RawSessionRecord, SessionRecord};
