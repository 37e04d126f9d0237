//! Background worker owning the durable session store.
//!
//! Zellij runs the worker on its own thread. The plugin never touches the
//! session file directly: it posts [`WorkerMessage`]s and applies the
//! [`WorkerResponse`]s that come back.

use crate::domain::error::Result;
use crate::infrastructure::paths;
use crate::storage::{JsonStore, MemoryStore, SessionStore};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker-side state. The store opens lazily on the first message.
#[derive(Default)]
pub struct CountryscopeWorker {
    store: Option<SessionStore>,
}

impl CountryscopeWorker {
    /// Creates a worker around an already restored store.
    #[must_use]
    pub fn with_store(store: SessionStore) -> Self {
        Self { store: Some(store) }
    }

    fn open_store() -> SessionStore {
        let path = paths::session_file();
        match JsonStore::open(path) {
            Ok(backend) => SessionStore::restore(Box::new(backend)),
            Err(e) => {
                tracing::warn!(error = %e, "cannot open session file, keeping session in memory");
                SessionStore::restore(Box::new(MemoryStore::new()))
            }
        }
    }

    fn store(&mut self) -> &mut SessionStore {
        self.store.get_or_insert_with(Self::open_store)
    }

    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes one message and returns the reply.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::RestoreSession { .. } => WorkerResponse::SessionLoaded {
                session: self.store().state().clone(),
            },
            WorkerMessage::Apply { command, .. } => {
                let result = self.store().dispatch(&command).map(Clone::clone);
                Self::handle_db_result("save session", result, |session| {
                    WorkerResponse::SessionSaved { session }
                })
            }
        }
    }

    /// Decodes a JSON payload, handles it and encodes the reply.
    ///
    /// Returns `None` when the payload is not a worker message or the reply
    /// cannot be encoded; both are logged.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = serde_json::from_str(payload)
            .map_err(|e| tracing::warn!(error = %e, "failed to deserialize worker message"))
            .ok()?;

        let response = self.handle_message(message);

        serde_json::to_string(&response)
            .map_err(|e| tracing::warn!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}
