//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place application state changes. It takes an
//! [`Event`] (a key press mapped by the plugin shim, a completed fetch, or a
//! worker response), mutates [`AppState`] and returns whether to re-render plus
//! the [`Action`]s the shim must perform.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `Activate`, `Back`
//! - **Text input**: `StartSearch`, `Char`, `Backspace`, `NextField`
//! - **Commands**: pickers, clear, favorites, history, theme, login/logout
//! - **Async results**: `FetchCompleted`, `WorkerResponse`, `PermissionsGranted`
//!
//! Session commands are applied to the local mirror right away and posted to
//! the worker, which persists them and answers with the authoritative state.
//!
//! # Example
//!
//! ```rust
//! use countryscope::api::CountryClient;
//! use countryscope::app::{handle_event, pipeline::Pipeline, Action, AppState, Event};
//! use countryscope::ui::Theme;
//!
//! let mut state = AppState::new(
//!     Pipeline::new(CountryClient::default()),
//!     Theme::default(),
//!     Theme::light(),
//! );
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted)?;
//! assert!(matches!(actions[0], Action::Fetch { .. }));
//! # Ok::<(), countryscope::CountryscopeError>(())
//! ```

use super::modes::{InputMode, LoginField, PickerKind, View};
use super::pipeline::{Effect, RequestId};
use super::state::LoginForm;
use crate::app::{Action, AppState};
use crate::domain::credentials::DemoCredentials;
use crate::domain::error::Result;
use crate::domain::session::{FavoriteEntry, SessionCommand};
use crate::ui::viewmodel::StatusLine;
use crate::worker::{WorkerMessage, WorkerResponse};
use chrono::Utc;

/// Events triggered by user input, completed fetches or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor down (wraps to top).
    KeyDown,
    /// Moves the cursor up (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,
    /// Enter: submit, pick, open or rerun depending on mode and view.
    Activate,
    /// Opens the search box.
    StartSearch,
    /// Appends a character to the focused text field.
    Char(char),
    /// Removes the last character from the focused text field.
    Backspace,
    /// Esc: leave the current mode or view.
    Back,
    /// Tab: switch login field.
    NextField,

    OpenRegionPicker,
    OpenLanguagePicker,
    /// Reloads the full list and drops the active filter.
    ClearFilter,
    /// Pins or unpins the selected country.
    ToggleFavorite,
    ShowFavorites,
    ShowRecentSearches,
    ClearRecentSearches,
    ToggleDarkMode,
    OpenLogin,
    Logout,

    /// A GET issued by [`Action::Fetch`] finished.
    FetchCompleted {
        id: RequestId,
        status: u16,
        body: Vec<u8>,
    },

    /// Wraps a response from the background worker.
    WorkerResponse(WorkerResponse),

    /// Host permissions were granted; the plugin may start fetching.
    PermissionsGranted,
}

impl Event {
    /// Returns `true` for events caused by a key press.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        !matches!(
            self,
            Self::FetchCompleted { .. } | Self::WorkerResponse(_) | Self::PermissionsGranted
        )
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when the UI should re-render.
///
/// # Errors
///
/// Currently infallible in practice; the `Result` lets callers log failures
/// uniformly with other plugin operations.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if event.is_user_input() {
        state.notice = None;
    }

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Activate => Ok(activate(state)),
        Event::StartSearch => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search;
            state.search_query.clear();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            match state.input_mode {
                InputMode::Search => state.search_query.push(*c),
                InputMode::Login(LoginField::Username) => state.login.username.push(*c),
                InputMode::Login(LoginField::Password) => state.login.password.push(*c),
                InputMode::Normal | InputMode::Picker(_) => return Ok((false, vec![])),
            }
            Ok((true, vec![]))
        }
        Event::Backspace => {
            match state.input_mode {
                InputMode::Search => {
                    state.search_query.pop();
                }
                InputMode::Login(LoginField::Username) => {
                    state.login.username.pop();
                }
                InputMode::Login(LoginField::Password) => {
                    state.login.password.pop();
                }
                InputMode::Normal | InputMode::Picker(_) => return Ok((false, vec![])),
            }
            Ok((true, vec![]))
        }
        Event::Back => Ok(back(state)),
        Event::NextField => {
            let InputMode::Login(field) = state.input_mode else {
                return Ok((false, vec![]));
            };
            state.input_mode = InputMode::Login(field.next());
            Ok((true, vec![]))
        }
        Event::OpenRegionPicker => Ok(open_picker(state, PickerKind::Region)),
        Event::OpenLanguagePicker => Ok(open_picker(state, PickerKind::Language)),
        Event::ClearFilter => {
            state.show(View::Countries);
            state.search_query.clear();
            Ok((true, fetch_action(state.pipeline.clear())))
        }
        Event::ToggleFavorite => Ok(toggle_favorite(state)),
        Event::ShowFavorites => Ok(show_private_view(state, View::Favorites)),
        Event::ShowRecentSearches => Ok(show_private_view(state, View::RecentSearches)),
        Event::ClearRecentSearches => {
            if state.view != View::RecentSearches || state.session.recent_searches.is_empty() {
                return Ok((false, vec![]));
            }
            let action = apply_session(state, SessionCommand::ClearRecentSearches);
            state.clamp_selection();
            Ok((true, vec![action]))
        }
        Event::ToggleDarkMode => {
            let enabled = !state.session.dark_mode;
            tracing::debug!(dark_mode = enabled, "toggling theme");
            let action = apply_session(state, SessionCommand::SetDarkMode(enabled));
            Ok((true, vec![action]))
        }
        Event::OpenLogin => {
            if let Some(user) = state.session.user.as_ref().filter(|_| state.session.authenticated) {
                state.notice = Some(info(format!("Already signed in as {}", user.name)));
                return Ok((true, vec![]));
            }
            state.login = LoginForm::default();
            state.input_mode = InputMode::Login(LoginField::Username);
            Ok((true, vec![]))
        }
        Event::Logout => {
            if !state.session.authenticated {
                return Ok((false, vec![]));
            }
            let action = apply_session(state, SessionCommand::Logout);
            if matches!(state.view, View::Favorites | View::RecentSearches) {
                state.show(View::Countries);
            }
            state.notice = Some(info("Signed out".to_string()));
            Ok((true, vec![action]))
        }
        Event::FetchCompleted { id, status, body } => {
            Ok((true, fetch_completed(state, *id, *status, body)))
        }
        Event::WorkerResponse(response) => Ok(worker_response(state, response)),
        Event::PermissionsGranted => {
            tracing::debug!("permissions granted, loading countries and session");
            let mut actions = fetch_action(state.pipeline.clear());
            actions.push(Action::PostToWorker(WorkerMessage::restore_session(
                state.trace_level.clone(),
            )));
            Ok((true, actions))
        }
    }
}

fn activate(state: &mut AppState) -> (bool, Vec<Action>) {
    match state.input_mode {
        InputMode::Search => {
            let term = std::mem::take(&mut state.search_query);
            tracing::debug!(term = %term, "submitting search");
            state.input_mode = InputMode::Normal;
            state.show(View::Countries);
            (true, fetch_action(state.pipeline.search(&term)))
        }
        InputMode::Picker(_) => {
            let Some((kind, option)) = state.picked_option() else {
                state.input_mode = InputMode::Normal;
                return (true, vec![]);
            };
            tracing::debug!(?kind, option, "applying filter");
            state.input_mode = InputMode::Normal;
            state.show(View::Countries);
            let fetch = match kind {
                PickerKind::Region => state.pipeline.filter_region(option),
                PickerKind::Language => state.pipeline.filter_language(option),
            };
            (true, fetch_action(fetch))
        }
        InputMode::Login(_) => submit_login(state),
        InputMode::Normal => match state.view {
            View::Countries | View::Favorites => {
                let code = state
                    .selected_country()
                    .map(|c| c.cca3.clone())
                    .or_else(|| state.selected_favorite().map(|f| f.cca3.clone()));
                let Some(code) = code else {
                    return (false, vec![]);
                };
                tracing::debug!(code = %code, "opening detail");
                state.return_view = state.view;
                (true, fetch_action(state.pipeline.select(&code)))
            }
            View::RecentSearches => {
                let Some(entry) = state.selected_recent().cloned() else {
                    return (false, vec![]);
                };
                tracing::debug!(kind = ?entry.kind, value = %entry.value, "rerunning recent search");
                state.show(View::Countries);
                (true, fetch_action(state.pipeline.rerun(&entry)))
            }
            View::Detail => (false, vec![]),
        },
    }
}

fn back(state: &mut AppState) -> (bool, Vec<Action>) {
    match state.input_mode {
        InputMode::Search | InputMode::Picker(_) => {
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            (true, vec![])
        }
        InputMode::Login(_) => {
            state.input_mode = InputMode::Normal;
            state.login = LoginForm::default();
            (true, vec![])
        }
        InputMode::Normal => match state.view {
            View::Detail => {
                state.pipeline.close_detail();
                state.view = state.return_view;
                state.clamp_selection();
                (true, vec![])
            }
            View::Favorites | View::RecentSearches => {
                state.show(View::Countries);
                (true, vec![])
            }
            View::Countries if state.pipeline.error().is_some() => {
                state.pipeline.dismiss_error();
                (true, vec![])
            }
            View::Countries => (false, vec![]),
        },
    }
}

fn open_picker(state: &mut AppState, kind: PickerKind) -> (bool, Vec<Action>) {
    state.input_mode = InputMode::Picker(kind);
    state.picker_index = 0;
    (true, vec![])
}

fn submit_login(state: &mut AppState) -> (bool, Vec<Action>) {
    let credentials = DemoCredentials::new(state.login.username.clone(), state.login.password.clone());
    match credentials.accept() {
        Ok(user) => {
            tracing::debug!(user = %user.name, "signed in");
            let greeting = format!("Signed in as {}", user.name);
            let action = apply_session(state, SessionCommand::Login(user));
            state.login = LoginForm::default();
            state.input_mode = InputMode::Normal;
            state.notice = Some(info(greeting));
            (true, vec![action])
        }
        Err(e) => {
            tracing::debug!(error = %e, "login rejected");
            state.login.error = Some(e.to_string());
            (true, vec![])
        }
    }
}

fn toggle_favorite(state: &mut AppState) -> (bool, Vec<Action>) {
    if let Some(favorite) = state.selected_favorite() {
        let code = favorite.cca3.clone();
        let action = apply_session(state, SessionCommand::RemoveFavorite(code));
        state.clamp_selection();
        return (true, vec![action]);
    }

    let Some(country) = state.selected_country() else {
        return (false, vec![]);
    };
    let entry = FavoriteEntry::from_country(country, Utc::now());
    tracing::debug!(code = %entry.cca3, "toggling favorite");
    let action = apply_session(state, SessionCommand::ToggleFavorite(entry));
    (true, vec![action])
}

/// Favorites and history belong to the signed-in user; ask for a login first.
fn show_private_view(state: &mut AppState, view: View) -> (bool, Vec<Action>) {
    if !state.session.authenticated {
        state.login = LoginForm::default();
        state.input_mode = InputMode::Login(LoginField::Username);
        state.notice = Some(info("Sign in to see your favorites and history".to_string()));
        return (true, vec![]);
    }
    state.show(view);
    (true, vec![])
}

fn fetch_completed(state: &mut AppState, id: RequestId, status: u16, body: &[u8]) -> Vec<Action> {
    let before = (
        state.pipeline.filter().cloned(),
        state.pipeline.display().len(),
    );

    let mut actions = vec![];
    for effect in state.pipeline.complete(id, status, body, Utc::now()) {
        match effect {
            Effect::Fetch(fetch) => actions.push(Action::Fetch {
                id: fetch.id,
                url: fetch.url,
            }),
            Effect::Record(entry) => {
                actions.push(apply_session(state, SessionCommand::AddRecentSearch(entry)));
            }
            Effect::DetailOpened => {
                state.input_mode = InputMode::Normal;
                state.view = View::Detail;
            }
        }
    }

    let after = (
        state.pipeline.filter().cloned(),
        state.pipeline.display().len(),
    );
    if state.view == View::Countries && before != after {
        state.selected_index = 0;
    } else {
        state.clamp_selection();
    }
    actions
}

fn worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::SessionLoaded { session } | WorkerResponse::SessionSaved { session } => {
            if &state.session == session {
                tracing::debug!("session unchanged, skipping render");
                return (false, vec![]);
            }
            state.session = session.clone();
            if !state.session.authenticated
                && matches!(state.view, View::Favorites | View::RecentSearches)
            {
                state.show(View::Countries);
            }
            state.clamp_selection();
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            state.notice = Some(StatusLine {
                message: format!("Could not save your changes: {message}"),
                is_error: true,
            });
            let restore = WorkerMessage::restore_session(state.trace_level.clone());
            (true, vec![Action::PostToWorker(restore)])
        }
    }
}

/// Applies a command to the local mirror and forwards it to the worker.
fn apply_session(state: &mut AppState, command: SessionCommand) -> Action {
    state.session = std::mem::take(&mut state.session).reduce(&command);
    Action::PostToWorker(WorkerMessage::apply(command))
}

fn fetch_action(fetch: Option<super::pipeline::Fetch>) -> Vec<Action> {
    fetch
        .map(|f| Action::Fetch { id: f.id, url: f.url })
        .into_iter()
        .collect()
}

const fn info(message: String) -> StatusLine {
    StatusLine {
        message,
        is_error: false,
    }
}
