//! Session state and its pure transition function.
//!
//! [`SessionState`] holds everything the plugin remembers between runs: the demo
//! login, pinned favorites, the recent-search log and the theme preference.
//! Every change is expressed as a [`SessionCommand`] and applied by
//! [`SessionState::reduce`], a pure function of `(old state, command)`. Persisting
//! the result is the job of [`crate::storage::SessionStore`].
//!
//! # Invariants
//!
//! - At most one [`FavoriteEntry`] per country code; favorites are unbounded.
//! - At most [`RECENT_SEARCH_LIMIT`] recent searches, newest first, unique by
//!   `(kind, value)`.

use crate::domain::country::Country;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the recent-search log.
pub const RECENT_SEARCH_LIMIT: usize = 10;

/// Which kind of action produced a recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Free-text search by country name.
    Search,
    /// Filter by region.
    Region,
    /// Filter by spoken language.
    Language,
}

impl SearchKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Region => "Region",
            Self::Language => "Language",
        }
    }
}

/// The signed-in demo user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, as typed into the login form.
    pub name: String,
    /// Avatar image reference.
    pub avatar: String,
}

/// Minimal projection of a [`Country`] pinned by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub cca3: String,
    pub name: String,
    pub flag: String,
    pub region: String,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    #[must_use]
    pub fn from_country(country: &Country, added_at: DateTime<Utc>) -> Self {
        Self {
            cca3: country.cca3.clone(),
            name: country.display_name().to_string(),
            flag: country.flag_ref(),
            region: country.region.clone(),
            added_at,
        }
    }
}

/// One entry of the recent-search log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

impl RecentSearchEntry {
    #[must_use]
    pub fn new(kind: SearchKind, value: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            value: value.into(),
            timestamp,
        }
    }

    /// Returns `true` if both entries describe the same action.
    ///
    /// Timestamps are ignored.
    #[must_use]
    pub fn same_action(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

/// A single change to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// Marks the session authenticated as `User`. Credentials are checked by
    /// [`crate::domain::DemoCredentials`] before this is issued.
    Login(User),
    /// Clears authentication and user; favorites and history are kept.
    Logout,
    /// Inserts the favorite unless one with the same code exists.
    AddFavorite(FavoriteEntry),
    /// Removes the favorite with this code, if any.
    RemoveFavorite(String),
    /// Removes the favorite with this entry's code, or adds the entry.
    ToggleFavorite(FavoriteEntry),
    AddRecentSearch(RecentSearchEntry),
    ClearRecentSearches,
    SetDarkMode(bool),
}

/// Everything persisted between plugin runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<User>,
    pub favorites: Vec<FavoriteEntry>,
    pub recent_searches: Vec<RecentSearchEntry>,
    pub dark_mode: bool,
}

impl SessionState {
    /// Applies a command and returns the resulting state.
    ///
    /// # Examples
    ///
    /// ```
    /// use countryscope::domain::session::{SessionCommand, SessionState, User};
    ///
    /// let user = User { name: "ada".into(), avatar: String::new() };
    /// let state = SessionState::default().reduce(&SessionCommand::Login(user));
    /// assert!(state.authenticated);
    ///
    /// let state = state.reduce(&SessionCommand::Logout);
    /// assert!(!state.authenticated);
    /// assert!(state.user.is_none());
    /// ```
    #[must_use]
    pub fn reduce(mut self, command: &SessionCommand) -> Self {
        match command {
            SessionCommand::Login(user) => {
                self.authenticated = true;
                self.user = Some(user.clone());
            }
            SessionCommand::Logout => {
                self.authenticated = false;
                self.user = None;
            }
            SessionCommand::AddFavorite(entry) => {
                if !self.is_favorite(&entry.cca3) {
                    self.favorites.push(entry.clone());
                }
            }
            SessionCommand::RemoveFavorite(code) => {
                self.favorites.retain(|fav| &fav.cca3 != code);
            }
            SessionCommand::ToggleFavorite(entry) => {
                if self.is_favorite(&entry.cca3) {
                    self.favorites.retain(|fav| fav.cca3 != entry.cca3);
                } else {
                    self.favorites.push(entry.clone());
                }
            }
            SessionCommand::AddRecentSearch(entry) => {
                self.recent_searches.retain(|existing| !existing.same_action(entry));
                self.recent_searches.insert(0, entry.clone());
                self.recent_searches.truncate(RECENT_SEARCH_LIMIT);
            }
            SessionCommand::ClearRecentSearches => self.recent_searches.clear(),
            SessionCommand::SetDarkMode(enabled) => self.dark_mode = *enabled,
        }
        self
    }

    #[must_use]
    pub fn is_favorite(&self, code: &str) -> bool {
        self.favorites.iter().any(|fav| fav.cca3 == code)
    }

    #[must_use]
    pub fn favorite(&self, code: &str) -> Option<&FavoriteEntry> {
        self.favorites.iter().find(|fav| fav.cca3 == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn favorite(code: &str, secs: i64) -> FavoriteEntry {
        FavoriteEntry {
            cca3: code.to_string(),
            name: format!("Country {code}"),
            flag: format!("https://flagcdn.com/{code}.svg"),
            region: "Africa".to_string(),
            added_at: at(secs),
        }
    }

    fn search(kind: SearchKind, value: &str, secs: i64) -> SessionCommand {
        SessionCommand::AddRecentSearch(RecentSearchEntry::new(kind, value, at(secs)))
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let mut state = SessionState::default();
        for i in 0..25 {
            state = state.reduce(&search(SearchKind::Search, &format!("term-{i}"), i));
        }
        assert_eq!(state.recent_searches.len(), RECENT_SEARCH_LIMIT);
        assert_eq!(state.recent_searches[0].value, "term-24");
        assert_eq!(state.recent_searches[9].value, "term-15");
        assert!(state
            .recent_searches
            .windows(2)
            .all(|pair| pair[0].timestamp > pair[1].timestamp));
    }

    #[test]
    fn repeated_action_moves_to_front_without_duplicates() {
        let state = SessionState::default()
            .reduce(&search(SearchKind::Region, "Africa", 1))
            .reduce(&search(SearchKind::Search, "Kenya", 2))
            .reduce(&search(SearchKind::Language, "French", 3))
            .reduce(&search(SearchKind::Region, "Africa", 4));

        let values: Vec<_> = state
            .recent_searches
            .iter()
            .map(|e| (e.kind, e.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                (SearchKind::Region, "Africa"),
                (SearchKind::Language, "French"),
                (SearchKind::Search, "Kenya"),
            ]
        );
        assert_eq!(state.recent_searches[0].timestamp, at(4));
    }

    #[test]
    fn same_value_with_different_kind_is_distinct() {
        let state = SessionState::default()
            .reduce(&search(SearchKind::Search, "French", 1))
            .reduce(&search(SearchKind::Language, "French", 2));
        assert_eq!(state.recent_searches.len(), 2);
    }

    #[test]
    fn add_favorite_is_idempotent() {
        let state = SessionState::default()
            .reduce(&SessionCommand::AddFavorite(favorite("KEN", 1)))
            .reduce(&SessionCommand::AddFavorite(favorite("KEN", 2)));
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.favorites[0].added_at, at(1));
    }

    #[test]
    fn favorites_are_unbounded_and_unique() {
        let mut state = SessionState::default();
        for i in 0..11 {
            state = state.reduce(&SessionCommand::AddFavorite(favorite(&format!("C{i:02}"), i)));
        }
        assert_eq!(state.favorites.len(), 11);
        state = state.reduce(&SessionCommand::AddFavorite(favorite("C00", 99)));
        assert_eq!(state.favorites.len(), 11);
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let before = SessionState::default().reduce(&SessionCommand::AddFavorite(favorite("FRA", 1)));

        let toggled = before
            .clone()
            .reduce(&SessionCommand::ToggleFavorite(favorite("KEN", 2)));
        assert!(toggled.is_favorite("KEN"));
        let restored = toggled.reduce(&SessionCommand::ToggleFavorite(favorite("KEN", 3)));
        assert_eq!(restored, before);

        let removed = before
            .clone()
            .reduce(&SessionCommand::ToggleFavorite(favorite("FRA", 4)));
        assert!(!removed.is_favorite("FRA"));
        let readded = removed.reduce(&SessionCommand::ToggleFavorite(favorite("FRA", 5)));
        assert!(readded.is_favorite("FRA"));
        assert_eq!(readded.favorite("FRA").map(|f| f.added_at), Some(at(5)));
    }

    #[test]
    fn remove_missing_favorite_is_noop() {
        let before = SessionState::default().reduce(&SessionCommand::AddFavorite(favorite("FRA", 1)));
        let after = before.clone().reduce(&SessionCommand::RemoveFavorite("KEN".into()));
        assert_eq!(after, before);
    }

    #[test]
    fn logout_keeps_favorites_and_history() {
        let user = User {
            name: "ada".to_string(),
            avatar: "https://ui-avatars.com/api/?name=ada&background=random".to_string(),
        };
        let state = SessionState::default()
            .reduce(&SessionCommand::Login(user))
            .reduce(&SessionCommand::AddFavorite(favorite("KEN", 1)))
            .reduce(&search(SearchKind::Search, "Kenya", 2))
            .reduce(&SessionCommand::Logout);

        assert!(!state.authenticated);
        assert!(state.user.is_none());
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.recent_searches.len(), 1);
    }

    #[test]
    fn entries_serialize_with_storage_field_names() {
        let entry = RecentSearchEntry::new(SearchKind::Language, "French", at(0));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "language");
        assert_eq!(json["value"], "French");

        let fav = serde_json::to_value(favorite("KEN", 0)).unwrap();
        assert_eq!(fav["cca3"], "KEN");
        assert!(fav.get("addedAt").is_some());
    }
}
