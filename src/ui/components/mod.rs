//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with the signed-in user on the right
//! - [`status`]: Error or notice line
//! - [`search`]: Search input box
//! - [`table`]: Country, favorite and history tables
//! - [`empty`]: Message shown when a table has no rows
//! - [`detail`]: One country in full
//! - [`picker`]: Region and language choices
//! - [`login`]: Demo login form
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Status]
//! [Search Bar - 3 lines, search mode only]
//! [Body: login form | picker | detail | table | empty state]
//! [Border]
//! [Footer]
//! ```

mod detail;
mod empty;
mod footer;
mod header;
mod login;
mod picker;
mod search;
mod status;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use detail::render_detail;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use login::render_login;
use picker::render_picker;
use search::render_search_bar;
use status::render_status;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders a full frame.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_status(current_row, vm.status.as_ref(), theme, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);

    if let Some(login) = &vm.login {
        render_login(current_row, login, theme);
    } else if let Some(picker) = &vm.picker {
        render_picker(current_row, picker, theme);
    } else if let Some(detail) = &vm.detail {
        render_detail(current_row, border_row, detail, theme, cols);
    } else if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        current_row = render_table_headers(current_row, &vm.columns, theme, cols);
        render_table_rows(current_row, &vm.columns, &vm.display_items, theme, cols);
    }

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
