//! Storage layer for persistent session data.
//!
//! # Modules
//!
//! - `backend`: Key/value trait abstraction for backend implementations
//! - `json`: JSON file-backed store with atomic writes
//! - `memory`: In-memory store for tests and fallbacks
//! - `session_store`: Session state restored from and persisted to a backend

pub mod backend;
pub mod json;
pub mod memory;
pub mod session_store;

pub use backend::KeyValueStore;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use session_store::SessionStore;
