//! Zellij plugin wrapper and entry point.
//!
//! The thin layer between the countryscope library and the Zellij host. It
//! maps host events to library events, performs the returned actions
//! (HTTP requests, worker messages, hiding the pane) and registers the
//! background worker that owns the session file.
//!
//! ```text
//! ┌──────────────────────────┐
//! │   Zellij Main Thread     │
//! │  ┌───────────────────┐   │
//! │  │  State (plugin)   │   │  ← keys, web requests, rendering
//! │  └───────────────────┘   │
//! │           │ IPC          │
//! │           ▼              │
//! │  ┌───────────────────┐   │
//! │  │  Worker           │   │  ← session.json reads and writes
//! │  └───────────────────┘   │
//! └──────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `Key` → navigation, text entry or command events depending on the input mode
//! - `WebRequestResult` → `Event::FetchCompleted` (the request id travels in the context)
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `PermissionRequestResult(Granted)` → `Event::PermissionsGranted`
//!
//! # Keybindings
//!
//! Global: `Ctrl+n`/`Ctrl+p` move, `Down`/`Up` move.
//!
//! Normal mode: `j`/`k` move, `Enter` open/rerun, `/` search, `r` region,
//! `l` language, `c` clear filter, `f` favorite, `v` favorites, `h` history,
//! `X` clear history, `t` theme, `L` login, `O` logout, `Esc` back, `q` close.
//!
//! Search and login: printable keys type, `Enter` submits, `Esc` cancels,
//! `Tab` switches login field.
//!
//! Pickers: `j`/`k` choose, `Enter` applies, `Esc` cancels.

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_arch = "wasm32")]
use std::collections::BTreeMap;
#[cfg(target_arch = "wasm32")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_arch = "wasm32")]
use countryscope::worker::{CountryscopeWorker, WorkerMessage, WorkerResponse};
#[cfg(target_arch = "wasm32")]
use countryscope::{handle_event, Action, AppState, Config, Event, InputMode};
#[cfg(target_arch = "wasm32")]
use serde::{Deserialize, Serialize};
#[cfg(target_arch = "wasm32")]
use zellij_tile::prelude::*;
#[cfg(target_arch = "wasm32")]
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

#[cfg(target_arch = "wasm32")]
const WORKER_NAME: &str = "countryscope";

#[cfg(target_arch = "wasm32")]
const REQUEST_ID_KEY: &str = "request_id";

#[cfg(target_arch = "wasm32")]
register_plugin!(State);
#[cfg(target_arch = "wasm32")]
register_worker!(Worker, countryscope_worker, COUNTRYSCOPE_WORKER);

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("countryscope is a Zellij plugin; build it for wasm32-wasip1 and load the .wasm from Zellij");
}

/// Plugin state wrapper around the library's [`AppState`].
#[cfg(target_arch = "wasm32")]
struct State {
    app: AppState,
    permissions_granted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for State {
    fn default() -> Self {
        Self {
            app: countryscope::initialize(&Config::default()),
            permissions_granted: false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ZellijPlugin for State {
    /// Parses configuration, sets up tracing and the app state, then asks for
    /// `WebAccess` (API calls) and `FullHdAccess` (session file).
    ///
    /// Nothing is fetched until the permission result arrives.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        countryscope::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(api = %config.api_base_url, fields = ?config.list_fields, "parsed configuration");

        self.app = countryscope::initialize(&config);

        request_permission(&[PermissionType::WebAccess, PermissionType::FullHdAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", otel.name = %format!("plugin_update::{event_name}"), event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_result_event(status, body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                match self.map_permission_result(permissions) {
                    Some(event) => event,
                    None => return true,
                }
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        countryscope::ui::render(&self.app, rows, cols);
    }
}

#[cfg(target_arch = "wasm32")]
impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps a key press according to the current input mode.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, mode = ?self.app.input_mode, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        match key.bare_key {
            BareKey::Down => return Some(Event::KeyDown),
            BareKey::Up => return Some(Event::KeyUp),
            BareKey::Enter => return Some(Event::Activate),
            BareKey::Esc => return Some(Event::Back),
            _ => {}
        }

        if self.app.input_mode.is_text_entry() {
            return match key.bare_key {
                BareKey::Backspace => Some(Event::Backspace),
                BareKey::Tab => Some(Event::NextField),
                BareKey::Char(c) => Some(Event::Char(c)),
                _ => None,
            };
        }

        match self.app.input_mode {
            InputMode::Picker(_) => match key.bare_key {
                BareKey::Char('j') => Some(Event::KeyDown),
                BareKey::Char('k') => Some(Event::KeyUp),
                _ => None,
            },
            _ => Some(match key.bare_key {
                BareKey::Char('j') => Event::KeyDown,
                BareKey::Char('k') => Event::KeyUp,
                BareKey::Char('q') => Event::CloseFocus,
                BareKey::Char('/') => Event::StartSearch,
                BareKey::Char('r') => Event::OpenRegionPicker,
                BareKey::Char('l') => Event::OpenLanguagePicker,
                BareKey::Char('c') => Event::ClearFilter,
                BareKey::Char('f') => Event::ToggleFavorite,
                BareKey::Char('v') => Event::ShowFavorites,
                BareKey::Char('h') => Event::ShowRecentSearches,
                BareKey::Char('X') => Event::ClearRecentSearches,
                BareKey::Char('t') => Event::ToggleDarkMode,
                BareKey::Char('L') => Event::OpenLogin,
                BareKey::Char('O') => Event::Logout,
                _ => return None,
            }),
        }
    }

    /// Recovers the request id from the context attached by [`Action::Fetch`].
    fn map_web_result_event(
        status: u16,
        body: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        let Some(id) = context.get(REQUEST_ID_KEY).and_then(|id| id.parse().ok()) else {
            tracing::warn!(status, "web request result without a request id");
            return None;
        };
        tracing::debug!(id, status, body_len = body.len(), "web request result");
        Some(Event::FetchCompleted { id, status, body })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => {
                tracing::debug!(response = ?response, "worker response received");
                Some(Event::WorkerResponse(response))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Returns [`Event::PermissionsGranted`] the first time permissions are granted.
    fn map_permission_result(&mut self, permissions: PermissionStatus) -> Option<Event> {
        match permissions {
            PermissionStatus::Granted if !self.permissions_granted => {
                tracing::debug!("permissions granted - starting first fetch");
                self.permissions_granted = true;
                Some(Event::PermissionsGranted)
            }
            PermissionStatus::Granted => None,
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - countries cannot be fetched");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::Fetch { id, url } => {
                let mut context = BTreeMap::new();
                context.insert(REQUEST_ID_KEY.to_string(), id.to_string());
                web_request(url, HttpVerb::Get, BTreeMap::new(), vec![], context);
            }
        }
    }
}

/// Worker thread tracing is set up on the first message only. That message is
/// the plugin's `RestoreSession`, which carries the configured `trace_level`.
#[cfg(target_arch = "wasm32")]
static WORKER_TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Zellij-facing wrapper around [`CountryscopeWorker`].
#[cfg(target_arch = "wasm32")]
#[derive(Default, Serialize, Deserialize)]
struct Worker {
    #[serde(skip)]
    inner: CountryscopeWorker,
}

#[cfg(target_arch = "wasm32")]
impl ZellijWorker<'_> for Worker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, Ordering::Relaxed) {
            let trace_level = serde_json::from_str::<WorkerMessage>(&payload)
                .ok()
                .and_then(|m| m.trace_level().map(String::from));
            countryscope::observability::init_tracing(&Config {
                trace_level,
                ..Config::default()
            });
        }

        let Some(reply) = self.inner.handle_payload(&payload) else {
            return;
        };
        post_message_to_plugin(PluginMessage {
            name: message,
            payload: reply,
            worker_name: None,
        });
    }
}
