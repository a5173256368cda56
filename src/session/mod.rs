// ABOUTME: Session registry module - durable bookkeeping of chat sessions
// Provides the key/value store abstraction and the registry built on top of it

pub mod registry;
pub mod store;

pub use registry::{new_session_id, SessionRegistry};
pub use store::{FileStore, KvStore, MemoryStore, NoopStore};
