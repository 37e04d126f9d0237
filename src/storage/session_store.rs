//! Durable session store.
//!
//! [`SessionStore`] owns the current [`SessionState`] and the backend it is
//! persisted to. Each field lives under its own key as a JSON-encoded string,
//! so one corrupt field never costs the others.

use crate::domain::country::Country;
use crate::domain::credentials::DemoCredentials;
use crate::domain::error::Result;
use crate::domain::session::{
    FavoriteEntry, RecentSearchEntry, SessionCommand, SessionState, RECENT_SEARCH_LIMIT,
};
use crate::storage::backend::KeyValueStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashSet;

pub const KEY_AUTHENTICATED: &str = "isAuthenticated";
pub const KEY_USER: &str = "user";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_RECENT_SEARCHES: &str = "recentSearches";
pub const KEY_DARK_MODE: &str = "darkMode";

/// Session state plus the backend it persists to.
///
/// # Examples
///
/// ```
/// use countryscope::storage::{MemoryStore, SessionStore};
///
/// let mut store = SessionStore::restore(Box::new(MemoryStore::new()));
/// store.set_dark_mode(true)?;
/// assert!(store.state().dark_mode);
/// # Ok::<(), countryscope::CountryscopeError>(())
/// ```
pub struct SessionStore {
    state: SessionState,
    backend: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Loads the session from `backend`.
    ///
    /// Missing or malformed keys fall back to their defaults individually and
    /// are logged at `warn`.
    #[must_use]
    pub fn restore(backend: Box<dyn KeyValueStore>) -> Self {
        let _span = tracing::debug_span!("session_restore").entered();

        let mut state = SessionState {
            authenticated: read_key(backend.as_ref(), KEY_AUTHENTICATED),
            user: read_key(backend.as_ref(), KEY_USER),
            favorites: read_key(backend.as_ref(), KEY_FAVORITES),
            recent_searches: read_key(backend.as_ref(), KEY_RECENT_SEARCHES),
            dark_mode: read_key(backend.as_ref(), KEY_DARK_MODE),
        };
        normalize(&mut state);

        tracing::debug!(
            authenticated = state.authenticated,
            favorites = state.favorites.len(),
            recent_searches = state.recent_searches.len(),
            "session restored"
        );

        Self { state, backend }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies `command`, persists the result, then makes it current.
    ///
    /// # Errors
    ///
    /// Returns the backend error if persisting fails. The previous state stays
    /// current in that case.
    pub fn dispatch(&mut self, command: &SessionCommand) -> Result<&SessionState> {
        let _span = tracing::debug_span!("session_dispatch", ?command).entered();

        let next = self.state.clone().reduce(command);
        self.persist(&next)?;
        self.state = next;
        Ok(&self.state)
    }

    /// Validates demo credentials and signs the user in.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field is empty, without changing
    /// state, or a storage error if persisting fails.
    pub fn login(&mut self, credentials: &DemoCredentials) -> Result<()> {
        let user = credentials.accept()?;
        self.dispatch(&SessionCommand::Login(user)).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn logout(&mut self) -> Result<()> {
        self.dispatch(&SessionCommand::Logout).map(|_| ())
    }

    /// Pins `country`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn add_favorite(&mut self, country: &Country) -> Result<()> {
        let entry = FavoriteEntry::from_country(country, Utc::now());
        self.dispatch(&SessionCommand::AddFavorite(entry)).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn remove_favorite(&mut self, code: &str) -> Result<()> {
        self.dispatch(&SessionCommand::RemoveFavorite(code.to_string()))
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn toggle_favorite(&mut self, country: &Country) -> Result<()> {
        let entry = FavoriteEntry::from_country(country, Utc::now());
        self.dispatch(&SessionCommand::ToggleFavorite(entry)).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn add_recent_search(&mut self, entry: RecentSearchEntry) -> Result<()> {
        self.dispatch(&SessionCommand::AddRecentSearch(entry)).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn clear_recent_searches(&mut self) -> Result<()> {
        self.dispatch(&SessionCommand::ClearRecentSearches).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.dispatch(&SessionCommand::SetDarkMode(enabled)).map(|_| ())
    }

    fn persist(&mut self, state: &SessionState) -> Result<()> {
        let entries = vec![
            (KEY_AUTHENTICATED, serde_json::to_string(&state.authenticated)?),
            (KEY_USER, serde_json::to_string(&state.user)?),
            (KEY_FAVORITES, serde_json::to_string(&state.favorites)?),
            (KEY_RECENT_SEARCHES, serde_json::to_string(&state.recent_searches)?),
            (KEY_DARK_MODE, serde_json::to_string(&state.dark_mode)?),
        ];
        self.backend.set_all(entries)
    }
}

fn read_key<T: DeserializeOwned + Default>(backend: &dyn KeyValueStore, key: &str) -> T {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read session key, using default");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "malformed session value, using default");
        T::default()
    })
}

// Values written by other tools may break the list invariants.
fn normalize(state: &mut SessionState) {
    let mut seen = HashSet::new();
    state.favorites.retain(|fav| seen.insert(fav.cca3.clone()));

    let mut unique: Vec<RecentSearchEntry> = Vec::with_capacity(state.recent_searches.len());
    for entry in state.recent_searches.drain(..) {
        if !unique.iter().any(|kept| kept.same_action(&entry)) {
            unique.push(entry);
        }
    }
    unique.truncate(RECENT_SEARCH_LIMIT);
    state.recent_searches = unique;
}
