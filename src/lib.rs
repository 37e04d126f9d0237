//! Countryscope: a Zellij plugin for exploring the countries of the world.
//!
//! Countryscope talks to the public REST Countries API and provides:
//! - Name search, region and language filters over the country list
//! - A detail view with capital, population, languages, currencies and neighbours
//! - A demo login guarding the personal views
//! - Favorites and a bounded recent-search history, persisted between runs
//! - Light and dark themes with a persisted preference
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! │  - key mapping, web_request, worker messaging       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling and actions                       │
//! │  - Query/filter pipeline                            │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Worker Layer  │
//! │ (ui/)         │   │ (api/)        │   │ (worker/)     │
//! │ - Rendering   │   │ - Endpoints   │   │ - Owns store  │
//! │ - Theming     │   │ - Decoding    │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/), Domain (domain/), Paths        │
//! │  - Session keys over a key/value backend            │
//! │  - Country model, session reducer, errors           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/countryscope.wasm" {
//!         api_base_url "https://restcountries.com/v3.1"
//!         list_fields "name,capital,population,region,subregion,flags,cca3,languages"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use countryscope::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted)?;
//! assert!(matches!(
//!     &actions[0],
//!     Action::Fetch { url, .. } if url.starts_with("https://restcountries.com/v3.1/all")
//! ));
//! # Ok::<(), countryscope::CountryscopeError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Permissions**: `WebAccess` for the API, `FullHdAccess` for the session file

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, View};
pub use domain::{Country, CountryscopeError, Result};
pub use ui::Theme;

use api::{CountryClient, DEFAULT_BASE_URL, DEFAULT_LIST_FIELDS};
use app::Pipeline;
use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST Countries base URL. Default: `https://restcountries.com/v3.1`
    pub api_base_url: String,

    /// Fields requested for list fetches (`/all`).
    pub list_fields: Vec<String>,

    /// Built-in theme used in dark mode: `catppuccin-mocha` or
    /// `catppuccin-latte`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme used in dark mode. `~` resolves inside the
    /// `/host` mount. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing filter, e.g. `debug` or `countryscope=trace`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            list_fields: default_list_fields(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

fn default_list_fields() -> Vec<String> {
    DEFAULT_LIST_FIELDS.iter().map(ToString::to_string).collect()
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Blank values fall back to defaults; `list_fields` is comma separated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use countryscope::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("list_fields".to_string(), "name, cca3".to_string());
    /// map.insert("theme".to_string(), "catppuccin-latte".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.list_fields, vec!["name", "cca3"]);
    /// assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
    /// assert_eq!(config.api_base_url, "https://restcountries.com/v3.1");
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let list_fields = non_blank("list_fields")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(default_list_fields);

        Self {
            api_base_url: non_blank("api_base_url").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            list_fields,
            theme_name: non_blank("theme"),
            theme_file: non_blank("theme_file"),
            trace_level: non_blank("trace_level"),
        }
    }

    /// Resolves the dark-mode theme: file, then name, then the built-in default.
    #[must_use]
    pub fn dark_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::expand_tilde(theme_file);
            match Theme::from_file(&path) {
                Ok(theme) => return theme,
                Err(e) => {
                    tracing::warn!(theme_file = %path, error = %e, "failed to load theme from file, using default");
                }
            }
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the initial [`AppState`] from configuration.
///
/// Nothing is fetched yet; the first fetch and the session restore are issued
/// once permissions are granted ([`Event::PermissionsGranted`]).
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api = %config.api_base_url, "initializing countryscope plugin");

    let client = CountryClient::new(config.api_base_url.clone(), config.list_fields.clone());
    let mut state = AppState::new(Pipeline::new(client), config.dark_theme(), Theme::light());
    state.trace_level.clone_from(&config.trace_level);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
        assert_eq!(Config::default().list_fields.len(), 8);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("api_base_url", "  "),
            ("list_fields", " , "),
            ("trace_level", "debug"),
        ]));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.list_fields, default_list_fields());
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn custom_base_url_reaches_the_client() {
        let config = Config::from_zellij(&map(&[("api_base_url", "http://localhost:8080/v3.1/")]));
        let state = initialize(&config);
        let mut pipeline = state.pipeline;
        let fetch = pipeline.search("chad").unwrap();
        assert_eq!(fetch.url, "http://localhost:8080/v3.1/name/chad");
    }

    #[test]
    fn theme_resolution_order() {
        let unknown = Config {
            theme_name: Some("nope".into()),
            ..Config::default()
        };
        assert_eq!(unknown.dark_theme().name, ui::theme::DARK_THEME);

        let latte = Config {
            theme_name: Some("catppuccin-latte".into()),
            ..Config::default()
        };
        assert_eq!(latte.dark_theme().name, ui::theme::LIGHT_THEME);

        let mut file = NamedTempFile::new().unwrap();
        let custom = include_str!("../themes/catppuccin-mocha.toml")
            .replace("catppuccin-mocha", "midnight");
        file.write_all(custom.as_bytes()).unwrap();
        let from_file = Config {
            theme_name: Some("catppuccin-latte".into()),
            theme_file: Some(file.path().to_string_lossy().into_owned()),
            ..Config::default()
        };
        assert_eq!(from_file.dark_theme().name, "midnight");
    }
}
