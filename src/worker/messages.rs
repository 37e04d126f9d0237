//! Worker message types for plugin/worker communication.
//!
//! The background worker owns the durable session store. The plugin sends it
//! session commands and receives the persisted state back. Messages carry an
//! optional [`TraceContext`] so worker spans join the plugin's trace.

use crate::domain::session::{SessionCommand, SessionState};
use serde::{Deserialize, Serialize};

/// Trace and parent span ids captured on the plugin side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is active or the span
    /// context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    restore_session(RestoreSession { trace_level: Option<String> }),
    apply(Apply { command: SessionCommand }),
}

/// Messages sent from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the persisted session. Carries the plugin's `trace_level` so the
    /// worker's subscriber filters like the plugin's.
    RestoreSession {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_level: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Apply one command and persist the result.
    Apply {
        command: SessionCommand,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::RestoreSession { trace_context, .. } | Self::Apply { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }

    #[must_use]
    pub fn trace_level(&self) -> Option<&str> {
        match self {
            Self::RestoreSession { trace_level, .. } => trace_level.as_deref(),
            Self::Apply { .. } => None,
        }
    }
}

/// Responses sent from the worker back to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The session as restored from storage.
    SessionLoaded { session: SessionState },

    /// A command was persisted; `session` is the authoritative state.
    SessionSaved { session: SessionState },

    /// The operation failed and nothing was persisted.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_cross_the_wire_as_json() {
        let message = WorkerMessage::apply(SessionCommand::SetDarkMode(true));
        assert!(message.trace_context().is_none());

        let payload = serde_json::to_string(&message).unwrap();
        assert!(!payload.contains("trace_context"));
        let decoded: WorkerMessage = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn restore_carries_trace_level() {
        let message = WorkerMessage::restore_session(Some("debug".into()));
        let payload = serde_json::to_string(&message).unwrap();
        let decoded: WorkerMessage = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded.trace_level(), Some("debug"));

        let bare: WorkerMessage = serde_json::from_str(r#"{"RestoreSession":{}}"#).unwrap();
        assert_eq!(bare.trace_level(), None);
        assert_eq!(WorkerMessage::apply(SessionCommand::Logout).trace_level(), None);
    }
}
