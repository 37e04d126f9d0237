//! Background worker for session persistence.
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::CountryscopeWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
