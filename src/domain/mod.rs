//! Domain layer for the countryscope plugin.
//!
//! Core types and rules, independent of Zellij APIs, HTTP transport and the
//! on-disk format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`country`]: Country records decoded from the API
//! - [`session`]: Favorites, recent searches, demo login and the session reducer
//! - [`credentials`]: Demo login validation
//!
//! # Examples
//!
//! ```
//! use countryscope::domain::{SessionCommand, SessionState};
//!
//! let state = SessionState::default().reduce(&SessionCommand::SetDarkMode(true));
//! assert!(state.dark_mode);
//! ```

pub mod country;
pub mod credentials;
pub mod error;
pub mod session;

pub use country::{format_population, Country, NOT_AVAILABLE};
pub use credentials::DemoCredentials;
pub use error::{CountryscopeError, Result};
pub use session::{
    FavoriteEntry, RecentSearchEntry, SearchKind, SessionCommand, SessionState, User,
    RECENT_SEARCH_LIMIT,
};
