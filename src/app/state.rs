//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for everything the plugin shows.
//! It owns the query [`Pipeline`] (display list, active filter, detail) and a
//! mirror of the persisted [`SessionState`]. The mirror is updated
//! optimistically when the handler issues a session command and replaced by the
//! worker's answer once it arrives.
//!
//! # View Model Computation
//!
//! [`AppState::compute_viewmodel`] turns a state snapshot into a
//! [`UIViewModel`]: it picks columns for the current view, windows the rows
//! around the selection and highlights the active search term in country names.
//!
//! # Example
//!
//! ```rust
//! use countryscope::api::CountryClient;
//! use countryscope::app::{pipeline::Pipeline, AppState};
//! use countryscope::ui::Theme;
//!
//! let state = AppState::new(
//!     Pipeline::new(CountryClient::default()),
//!     Theme::default(),
//!     Theme::light(),
//! );
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert_eq!(viewmodel.header.title, "All Countries (0)");
//! ```

use super::modes::{InputMode, PickerKind, View};
use super::pipeline::{list_title, Pipeline};
use crate::domain::country::{format_population, Country, NOT_AVAILABLE};
use crate::domain::session::{FavoriteEntry, RecentSearchEntry, SearchKind, SessionState};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    Column, DetailPanel, DisplayItem, EmptyState, FooterInfo, HeaderInfo, LoginPanel,
    PickerPanel, SearchBarInfo, StatusLine, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Rows taken by the header, borders, status line, column headings and footer.
const CHROME_ROWS: usize = 7;
/// Extra rows taken by the search box.
const SEARCH_BAR_ROWS: usize = 3;

/// Contents of the demo login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Validation message shown under the fields.
    pub error: Option<String>,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Display list, active filter, detail country and in-flight fetches.
    pub pipeline: Pipeline,

    /// Local mirror of the worker-owned session.
    pub session: SessionState,

    pub view: View,

    /// View to go back to when the detail view closes.
    pub return_view: View,

    pub input_mode: InputMode,

    /// Search term being typed. Submitted on Enter.
    pub search_query: String,

    /// Zero-based cursor within the rows of the current view.
    pub selected_index: usize,

    /// Cursor within the open picker.
    pub picker_index: usize,

    pub login: LoginForm,

    /// One-off message for the status line, cleared by the next key press.
    pub notice: Option<StatusLine>,

    pub dark_theme: Theme,
    pub light_theme: Theme,

    /// Forwarded to the worker so both threads trace at the same level.
    pub trace_level: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: Pipeline, dark_theme: Theme, light_theme: Theme) -> Self {
        Self {
            pipeline,
            session: SessionState::default(),
            view: View::Countries,
            return_view: View::Countries,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            selected_index: 0,
            picker_index: 0,
            login: LoginForm::default(),
            notice: None,
            dark_theme,
            light_theme,
            trace_level: None,
        }
    }

    /// Theme matching the session's dark-mode preference.
    #[must_use]
    pub const fn theme(&self) -> &Theme {
        if self.session.dark_mode {
            &self.dark_theme
        } else {
            &self.light_theme
        }
    }

    /// Number of selectable rows in the current view.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self.view {
            View::Countries => self.pipeline.display().len(),
            View::Favorites => self.session.favorites.len(),
            View::RecentSearches => self.session.recent_searches.len(),
            View::Detail => 0,
        }
    }

    /// Moves selection cursor down by one position, wrapping to top if at end.
    pub fn move_selection_down(&mut self) {
        if let InputMode::Picker(kind) = self.input_mode {
            self.picker_index = (self.picker_index + 1) % kind.options().len();
            return;
        }

        let count = self.row_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves selection cursor up by one position, wrapping to bottom if at start.
    pub fn move_selection_up(&mut self) {
        if let InputMode::Picker(kind) = self.input_mode {
            let count = kind.options().len();
            self.picker_index = (self.picker_index + count - 1) % count;
            return;
        }

        let count = self.row_count();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Keeps the cursor inside the current row list after it changed size.
    ///
    /// The detail view has no rows, so the list cursor is left alone there.
    pub fn clamp_selection(&mut self) {
        if self.view == View::Detail {
            return;
        }
        let count = self.row_count();
        self.selected_index = if count == 0 {
            0
        } else {
            self.selected_index.min(count - 1)
        };
    }

    /// Switches view and puts the cursor on the first row.
    pub fn show(&mut self, view: View) {
        tracing::debug!(from = ?self.view, to = ?view, "switching view");
        self.view = view;
        self.selected_index = 0;
    }

    #[must_use]
    pub fn selected_country(&self) -> Option<&Country> {
        match self.view {
            View::Countries => self.pipeline.display().get(self.selected_index),
            View::Detail => self.pipeline.detail(),
            View::Favorites | View::RecentSearches => None,
        }
    }

    #[must_use]
    pub fn selected_favorite(&self) -> Option<&FavoriteEntry> {
        if self.view == View::Favorites {
            self.session.favorites.get(self.selected_index)
        } else {
            None
        }
    }

    #[must_use]
    pub fn selected_recent(&self) -> Option<&RecentSearchEntry> {
        if self.view == View::RecentSearches {
            self.session.recent_searches.get(self.selected_index)
        } else {
            None
        }
    }

    /// Option under the picker cursor, if a picker is open.
    #[must_use]
    pub fn picked_option(&self) -> Option<(PickerKind, &'static str)> {
        match self.input_mode {
            InputMode::Picker(kind) => kind
                .options()
                .get(self.picker_index)
                .map(|option| (kind, *option)),
            _ => None,
        }
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Subtract UI chrome (header, borders, status, column headings, footer,
    ///    search box when visible) from `rows`
    /// 2. Center the window around the selected row
    /// 3. Slide the window back when it would run past the end
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", rows, cols, view = ?self.view)
            .entered();

        let mut vm = UIViewModel {
            header: self.compute_header(),
            footer: self.compute_footer(),
            columns: self.columns(),
            display_items: vec![],
            selected_index: 0,
            status: self.compute_status(),
            empty_state: None,
            search_bar: self.compute_search_bar(),
            detail: None,
            picker: self.compute_picker(),
            login: self.compute_login(),
        };

        if self.view == View::Detail {
            vm.detail = self.compute_detail();
            return vm;
        }

        let total = self.row_count();
        if total == 0 {
            vm.empty_state = Some(self.compute_empty_state());
            return vm;
        }

        let available_rows = self.calculate_available_rows(rows).max(1);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(total);

        if visible_end - visible_start < available_rows && total >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let matcher = self.highlight_term().map(|_| SkimMatcherV2::default());

        vm.display_items = (visible_start..visible_end)
            .filter_map(|idx| self.compute_display_item(idx, &vm.columns, cols, matcher.as_ref()))
            .collect();
        vm.selected_index = self.selected_index.saturating_sub(visible_start);
        vm
    }

    fn columns(&self) -> Vec<Column> {
        let column = |title, width| Column { title, width };
        match self.view {
            View::Countries => vec![
                column("NAME", Some(30)),
                column("CAPITAL", Some(20)),
                column("REGION", Some(12)),
                column("POPULATION", None),
            ],
            View::Favorites => vec![
                column("NAME", Some(30)),
                column("REGION", Some(12)),
                column("ADDED", None),
            ],
            View::RecentSearches => vec![
                column("TYPE", Some(10)),
                column("VALUE", Some(30)),
                column("WHEN", None),
            ],
            View::Detail => vec![],
        }
    }

    /// The search term to highlight, when the list shows search results.
    fn highlight_term(&self) -> Option<&str> {
        if self.view != View::Countries {
            return None;
        }
        self.pipeline
            .filter()
            .filter(|f| f.kind == SearchKind::Search)
            .map(|f| f.value.as_str())
    }

    fn compute_display_item(
        &self,
        idx: usize,
        columns: &[Column],
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> Option<DisplayItem> {
        let (raw_cells, is_favorite, highlight_source) = match self.view {
            View::Countries => {
                let country = self.pipeline.display().get(idx)?;
                let name = country.display_name().to_string();
                (
                    vec![
                        name.clone(),
                        country.primary_capital().to_string(),
                        country.region.clone(),
                        format_population(country.population),
                    ],
                    self.session.is_favorite(&country.cca3),
                    Some(name),
                )
            }
            View::Favorites => {
                let entry = self.session.favorites.get(idx)?;
                (
                    vec![
                        entry.name.clone(),
                        entry.region.clone(),
                        entry.added_at.format("%Y-%m-%d").to_string(),
                    ],
                    true,
                    None,
                )
            }
            View::RecentSearches => {
                let entry = self.session.recent_searches.get(idx)?;
                (
                    vec![
                        entry.kind.label().to_string(),
                        entry.value.clone(),
                        entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    ],
                    false,
                    None,
                )
            }
            View::Detail => return None,
        };

        let cells: Vec<String> = raw_cells
            .iter()
            .zip(columns)
            .map(|(text, column)| fit(text, column_width(column, columns, cols)))
            .collect();

        let highlight_ranges = match (matcher, highlight_source, self.highlight_term()) {
            (Some(m), Some(name), Some(term)) => {
                let visible = cells.first().map_or(0, |c| c.chars().count());
                compute_highlight_ranges(&name, term, m)
                    .into_iter()
                    .filter(|&(start, _)| start < visible)
                    .map(|(start, end)| (start, end.min(visible)))
                    .collect()
            }
            _ => vec![],
        };

        Some(DisplayItem {
            cells,
            is_selected: idx == self.selected_index,
            is_favorite,
            highlight_ranges,
        })
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match self.view {
            View::Countries => format!(
                "{} ({})",
                list_title(self.pipeline.filter()),
                self.pipeline.display().len()
            ),
            View::Favorites => format!("Favorite Countries ({})", self.session.favorites.len()),
            View::RecentSearches => {
                format!("Recent Searches ({})", self.session.recent_searches.len())
            }
            View::Detail => self
                .pipeline
                .detail()
                .map_or_else(|| "Country details".to_string(), |c| c.display_name().to_string()),
        };

        let mut context = match (&self.session.user, self.session.authenticated) {
            (Some(user), true) => format!("Signed in as {}", user.name),
            _ => "Not signed in".to_string(),
        };
        if self.pipeline.loading() {
            context.push_str("  [loading]");
        }

        HeaderInfo { title, context }
    }

    fn compute_footer(&self) -> FooterInfo {
        let account = if self.session.authenticated {
            "O: logout"
        } else {
            "L: login"
        };

        let keybindings = match (self.input_mode, self.view) {
            (InputMode::Search, _) => "Enter: search  ESC: cancel  Type a country name".to_string(),
            (InputMode::Picker(_), _) => "j/k: choose  Enter: apply  ESC: cancel".to_string(),
            (InputMode::Login(_), _) => "Tab: next field  Enter: sign in  ESC: cancel".to_string(),
            (InputMode::Normal, View::Countries) => format!(
                "j/k: navigate  Enter: details  /: search  r: region  l: language  c: clear  \
                 f: favorite  v: favorites  h: history  t: theme  {account}  q: quit"
            ),
            (InputMode::Normal, View::Favorites) => {
                "j/k: navigate  Enter: details  f: unpin  ESC: back  q: quit".to_string()
            }
            (InputMode::Normal, View::RecentSearches) => {
                "j/k: navigate  Enter: run again  X: clear all  ESC: back  q: quit".to_string()
            }
            (InputMode::Normal, View::Detail) => {
                "f: favorite  t: theme  ESC: back  q: quit".to_string()
            }
        };

        FooterInfo { keybindings }
    }

    fn compute_status(&self) -> Option<StatusLine> {
        self.pipeline
            .error()
            .map(|message| StatusLine {
                message: message.to_string(),
                is_error: true,
            })
            .or_else(|| self.notice.clone())
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        if self.input_mode == InputMode::Search {
            Some(SearchBarInfo {
                query: self.search_query.clone(),
            })
        } else {
            None
        }
    }

    fn compute_picker(&self) -> Option<PickerPanel> {
        let InputMode::Picker(kind) = self.input_mode else {
            return None;
        };
        Some(PickerPanel {
            title: kind.title(),
            options: kind.options().iter().map(ToString::to_string).collect(),
            selected_index: self.picker_index,
        })
    }

    fn compute_login(&self) -> Option<LoginPanel> {
        let InputMode::Login(field) = self.input_mode else {
            return None;
        };
        Some(LoginPanel {
            username: self.login.username.clone(),
            password_mask: "*".repeat(self.login.password.chars().count()),
            username_focused: field == super::modes::LoginField::Username,
            error: self.login.error.clone(),
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        let (message, subtitle) = match self.view {
            View::Countries if self.pipeline.loading() => ("Loading countries...", ""),
            View::Countries if self.highlight_term().is_some() => {
                ("No countries found", "Try a different search term")
            }
            View::Countries => ("No countries to show", "Press c to reload the full list"),
            View::Favorites => ("No favorite countries yet", "Press f on a country to pin it"),
            View::RecentSearches => (
                "No recent searches",
                "Searches and filters you run appear here",
            ),
            View::Detail => ("", ""),
        };
        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn compute_detail(&self) -> Option<DetailPanel> {
        let country = self.pipeline.detail()?;
        let or_na = |values: Vec<String>| {
            if values.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                values.join(", ")
            }
        };

        let region = match &country.subregion {
            Some(sub) if !sub.is_empty() => format!("{} ({sub})", country.region),
            _ => country.region.clone(),
        };

        let borders = if country.borders.is_empty() {
            "None".to_string()
        } else {
            country
                .borders
                .iter()
                .map(|code| self.pipeline.border_name(code).unwrap_or(code.as_str()).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let link = |value: Option<&String>| {
            value.map_or_else(|| NOT_AVAILABLE.to_string(), Clone::clone)
        };

        let flag = country.flag_ref();
        let fields = vec![
            ("Official name", country.name.official.clone()),
            ("Capital", country.primary_capital().to_string()),
            ("Region", region),
            ("Population", format_population(country.population)),
            (
                "Languages",
                or_na(country.language_names().into_iter().map(String::from).collect()),
            ),
            ("Currencies", or_na(country.currency_labels())),
            (
                "Calling code",
                country
                    .dialing_code()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("Borders", borders),
            (
                "Flag",
                if flag.is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    flag
                },
            ),
            (
                "Coat of arms",
                link(country.coat_of_arms.png.as_ref().or(country.coat_of_arms.svg.as_ref())),
            ),
            (
                "Map",
                link(country.maps.google_maps.as_ref().or(country.maps.open_street_maps.as_ref())),
            ),
        ];

        Some(DetailPanel {
            name: country.display_name().to_string(),
            is_favorite: self.session.is_favorite(&country.cca3),
            fields,
        })
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Search => total_rows.saturating_sub(CHROME_ROWS + SEARCH_BAR_ROWS),
            _ => total_rows.saturating_sub(CHROME_ROWS),
        }
    }
}

/// Width a cell may occupy, leaving one space before the next column.
fn column_width(column: &Column, columns: &[Column], cols: usize) -> usize {
    const MARKER_WIDTH: usize = 2;
    column.width.map_or_else(
        || {
            let fixed: usize = columns.iter().filter_map(|c| c.width).sum();
            cols.saturating_sub(fixed + MARKER_WIDTH)
        },
        |width| width.saturating_sub(1),
    )
}

/// Truncates `text` to `width` characters, marking the cut with `...`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

/// Coalesces fuzzy match indices into `(start, end)` character ranges.
fn compute_highlight_ranges(
    text: &str,
    term: &str,
    matcher: &SkimMatcherV2,
) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, term) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        if let Some(last) = ranges.last_mut().filter(|(_, end)| *end == idx) {
            last.1 = idx + 1;
        } else {
            ranges.push((idx, idx + 1));
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CountryClient;
    use crate::domain::session::{SessionCommand, User};
    use chrono::{DateTime, Utc};

    const ALL: &str = r#"[
        {"cca3": "KEN", "name": {"common": "Kenya"}, "capital": ["Nairobi"],
         "region": "Africa", "population": 53771300},
        {"cca3": "SEN", "name": {"common": "Senegal"}, "capital": ["Dakar"],
         "region": "Africa", "population": 16743930},
        {"cca3": "FRA", "name": {"common": "France"}, "region": "Europe"}
    ]"#;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn loaded() -> AppState {
        let mut pipeline = Pipeline::new(CountryClient::new("https://api.test", vec![]));
        let fetch = pipeline.clear().unwrap();
        pipeline.complete(fetch.id, 200, ALL.as_bytes(), now());
        AppState::new(pipeline, Theme::default(), Theme::light())
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut state = loaded();
        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
        assert_eq!(state.selected_country().map(|c| c.cca3.as_str()), Some("KEN"));
    }

    #[test]
    fn picker_cursor_moves_independently() {
        let mut state = loaded();
        state.input_mode = InputMode::Picker(PickerKind::Region);
        state.move_selection_up();
        assert_eq!(state.picked_option(), Some((PickerKind::Region, "Oceania")));
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn country_rows_have_four_columns_and_favorite_marker() {
        let mut state = loaded();
        let kenya = state.pipeline.display()[0].clone();
        state.session = SessionState::default()
            .reduce(&SessionCommand::AddFavorite(FavoriteEntry::from_country(&kenya, now())));

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.columns.len(), 4);
        assert_eq!(vm.display_items.len(), 3);
        assert_eq!(
            vm.display_items[0].cells,
            vec!["Kenya", "Nairobi", "Africa", "53,771,300"]
        );
        assert!(vm.display_items[0].is_favorite);
        assert!(vm.display_items[0].is_selected);
        assert_eq!(vm.display_items[2].cells[1], NOT_AVAILABLE);
        assert_eq!(vm.header.title, "All Countries (3)");
        assert_eq!(vm.header.context, "Not signed in");
    }

    #[test]
    fn window_follows_selection_on_short_terminal() {
        let mut state = loaded();
        state.selected_index = 2;
        let vm = state.compute_viewmodel(CHROME_ROWS + 2, 80);
        assert_eq!(vm.display_items.len(), 2);
        assert_eq!(vm.display_items[1].cells[0], "France");
        assert_eq!(vm.selected_index, 1);
    }

    #[test]
    fn search_results_highlight_matched_name_characters() {
        let mut state = loaded();
        let fetch = state.pipeline.search("ken").unwrap();
        state.pipeline.complete(
            fetch.id,
            200,
            br#"[{"cca3": "KEN", "name": {"common": "Kenya"}}]"#,
            now(),
        );

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.header.title, "Search results for: \"ken\" (1)");
        assert_eq!(vm.display_items[0].highlight_ranges, vec![(0, 3)]);
    }

    #[test]
    fn empty_search_shows_no_results_message() {
        let mut state = loaded();
        let fetch = state.pipeline.search("Wakanda").unwrap();
        state.pipeline.complete(fetch.id, 404, b"", now());

        let vm = state.compute_viewmodel(24, 80);
        assert!(vm.display_items.is_empty());
        assert_eq!(vm.empty_state.unwrap().message, "No countries found");
    }

    #[test]
    fn recent_view_lists_entries_newest_first() {
        let mut state = loaded();
        state.session = SessionState::default()
            .reduce(&SessionCommand::AddRecentSearch(RecentSearchEntry::new(
                SearchKind::Region,
                "Africa",
                now(),
            )))
            .reduce(&SessionCommand::AddRecentSearch(RecentSearchEntry::new(
                SearchKind::Language,
                "French",
                now(),
            )));
        state.show(View::RecentSearches);

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.header.title, "Recent Searches (2)");
        assert_eq!(vm.display_items[0].cells[0], "Language");
        assert_eq!(vm.display_items[1].cells[1], "Africa");
        assert_eq!(state.selected_recent().map(|e| e.value.as_str()), Some("French"));
    }

    #[test]
    fn header_names_signed_in_user_and_theme_follows_dark_mode() {
        let mut state = loaded();
        assert_eq!(state.theme().name, crate::ui::theme::LIGHT_THEME);

        state.session = SessionState::default()
            .reduce(&SessionCommand::Login(User {
                name: "ada".into(),
                avatar: String::new(),
            }))
            .reduce(&SessionCommand::SetDarkMode(true));
        assert_eq!(state.theme().name, crate::ui::theme::DARK_THEME);
        assert_eq!(state.compute_viewmodel(24, 80).header.context, "Signed in as ada");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(fit("United Kingdom of Great Britain", 10), "United ...");
        assert_eq!(fit("Chad", 10), "Chad");
        assert_eq!(fit("Chad", 2), "Ch");
    }

    #[test]
    fn error_takes_the_status_line() {
        let mut state = loaded();
        let fetch = state.pipeline.filter_region("Asia").unwrap();
        state.pipeline.complete(fetch.id, 500, b"", now());

        let status = state.compute_viewmodel(24, 80).status.unwrap();
        assert!(status.is_error);
        assert_eq!(status.message, crate::app::pipeline::REGION_FAILED);
    }
}
