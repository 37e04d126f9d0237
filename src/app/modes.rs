//! Input modes and views.
//!
//! The plugin shows one [`View`] at a time. The [`InputMode`] decides how keys
//! are interpreted: in `Normal` mode letters are commands, while search and
//! login modes treat them as text.

/// Regions offered by the region picker.
pub const REGIONS: &[&str] = &["Africa", "Americas", "Asia", "Europe", "Oceania"];

/// Languages offered by the language picker.
pub const LANGUAGES: &[&str] = &["English", "Spanish", "French", "Arabic", "Chinese", "Russian"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The display list produced by the pipeline.
    Countries,
    Favorites,
    RecentSearches,
    /// One country in full.
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Region,
    Language,
}

impl PickerKind {
    #[must_use]
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::Region => REGIONS,
            Self::Language => LANGUAGES,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Region => "Filter by region",
            Self::Language => "Filter by language",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl LoginField {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Username,
        }
    }
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Letters are commands.
    Normal,
    /// Typing a search term; Enter submits.
    Search,
    /// Choosing from a fixed list; Enter applies.
    Picker(PickerKind),
    /// Typing into the login form.
    Login(LoginField),
}

impl InputMode {
    /// Returns `true` if printable keys should be treated as text.
    #[must_use]
    pub const fn is_text_entry(self) -> bool {
        matches!(self, Self::Search | Self::Login(_))
    }
}
