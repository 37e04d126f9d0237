//! Search bar component renderer.

use crate::ui::helpers::{display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the 3-line search box and returns the row after it.
///
/// ```text
/// [margin] ┌──────────────────┐ [margin]
/// [margin] │ Country: ken     │ [margin]
/// [margin] └──────────────────┘ [margin]
/// ```
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let inner_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2 + 2);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let border = Theme::fg(&theme.colors.search_bar_border);
    let edge = "─".repeat(inner_width);

    let prompt: String = format!(" Country: {}_", search.query)
        .chars()
        .take(inner_width)
        .collect();
    let fill = " ".repeat(inner_width.saturating_sub(display_width(&prompt)));

    position_cursor(row, 1);
    print!("{margin}{border}┌{edge}┐{}", Theme::reset());

    position_cursor(row + 1, 1);
    print!(
        "{margin}{border}│{}{prompt}{fill}{border}│{}",
        Theme::fg(&theme.colors.text_normal),
        Theme::reset()
    );

    position_cursor(row + 2, 1);
    print!("{margin}{border}└{edge}┘{}", Theme::reset());

    row + 3
}
