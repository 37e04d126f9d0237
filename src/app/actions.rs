//! Side effects requested by the event handler.
//!
//! [`crate::app::handle_event`] mutates state and returns a list of actions;
//! the plugin shim in `main.rs` performs them against the Zellij host.

use crate::app::pipeline::RequestId;
use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker.
    PostToWorker(WorkerMessage),

    /// Issues a GET request; the result comes back tagged with `id`.
    Fetch {
        id: RequestId,
        url: String,
    },
}
