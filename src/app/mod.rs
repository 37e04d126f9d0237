//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin shim (`main.rs`) and the domain, api and worker
//! layers. Data flows one way:
//!
//! ```text
//! Key / fetch result / worker reply → Event → handle_event → AppState → Actions
//!                                                  ↑                       ↓
//!                                                  └── web_request, worker ┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Views, pickers and input modes
//! - [`pipeline`]: Search/filter/detail fetches and the display list
//! - [`state`]: Central state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod pipeline;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, LoginField, PickerKind, View};
pub use pipeline::{ActiveFilter, Pipeline};
pub use state::{AppState, LoginForm};
