//! View model types representing renderable UI state.
//!
//! View models are computed by [`crate::app::AppState::compute_viewmodel`] and
//! consumed by the renderer. They hold display-ready strings only.

/// Complete UI view model for one frame.
///
/// At most one of `login`, `picker` and `detail` is set; when none is, the
/// table (or `empty_state`) fills the body.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Column headings for the table body.
    pub columns: Vec<Column>,
    /// Rows inside the visible window.
    pub display_items: Vec<DisplayItem>,
    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub status: Option<StatusLine>,
    pub empty_state: Option<EmptyState>,
    pub search_bar: Option<SearchBarInfo>,
    pub detail: Option<DetailPanel>,
    pub picker: Option<PickerPanel>,
    pub login: Option<LoginPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    /// Fixed width in cells; `None` takes the rest of the line.
    pub width: Option<usize>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// Cell text, one per column.
    pub cells: Vec<String>,
    pub is_selected: bool,
    /// Marks pinned countries.
    pub is_favorite: bool,
    /// Character ranges of the first cell matching the active search.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Right-hand side: signed-in user and loading marker.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub is_error: bool,
}

/// Shown in place of the table when there are no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
}

/// Label/value pairs describing one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub name: String,
    pub is_favorite: bool,
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerPanel {
    pub title: &'static str,
    pub options: Vec<String>,
    pub selected_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPanel {
    pub username: String,
    /// Password rendered as mask characters.
    pub password_mask: String,
    pub username_focused: bool,
    pub error: Option<String>,
}
