//! Table component renderer.
//!
//! Columns come from the view model; every row starts with a two-cell marker
//! column that shows a star for favorite countries.

use crate::ui::helpers::{self, display_width, position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Column, DisplayItem};

const MARKER: &str = "★ ";
const MARKER_WIDTH: usize = 2;

/// Renders the bold column headings. Returns the next row.
pub fn render_table_headers(row: usize, columns: &[Column], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", " ".repeat(MARKER_WIDTH));

    let mut used = MARKER_WIDTH;
    for column in columns {
        let width = column.width.unwrap_or_else(|| cols.saturating_sub(used));
        print_padded(column.title, width);
        used += width;
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders every row and returns the row after the last one.
pub fn render_table_rows(
    row: usize,
    columns: &[Column],
    items: &[DisplayItem],
    theme: &Theme,
    cols: usize,
) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, columns, item, theme, cols);
    }
    current_row
}

/// Styling precedence: selection colors, then match highlights, then normal
/// text. The row is padded to `cols` so the selection bar spans the line.
fn render_table_row(
    row: usize,
    columns: &[Column],
    item: &DisplayItem,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(row, 1);

    let row_colors = if item.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    print!("{row_colors}");

    if item.is_favorite {
        if !item.is_selected {
            print!("{}", Theme::fg(&theme.colors.favorite_fg));
        }
        print!("{MARKER}");
        print!("{row_colors}");
    } else {
        print!("{}", " ".repeat(MARKER_WIDTH));
    }

    let mut used = MARKER_WIDTH;
    for (idx, (cell, column)) in item.cells.iter().zip(columns).enumerate() {
        let width = column.width.unwrap_or_else(|| cols.saturating_sub(used));
        if idx == 0 && !item.highlight_ranges.is_empty() {
            helpers::render_highlighted_text(
                cell,
                &item.highlight_ranges,
                theme,
                item.is_selected,
                &row_colors,
            );
            print!("{}", " ".repeat(width.saturating_sub(display_width(cell))));
        } else {
            print_padded(cell, width);
        }
        used += width.max(display_width(cell));
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
