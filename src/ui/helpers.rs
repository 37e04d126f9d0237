//! Shared rendering utilities.
//!
//! Text is measured in characters, not bytes, so country names such as
//! "Côte d'Ivoire" line up with the rest of the table.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row` and `col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Number of terminal cells `text` takes, assuming one cell per character.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Prints `text` left-aligned in a field of `width` cells.
pub fn print_padded(text: &str, width: usize) {
    print!("{text}");
    print!("{}", " ".repeat(width.saturating_sub(display_width(text))));
}

/// Prints `text` centered in a line of `cols` cells.
pub fn print_centered(text: &str, cols: usize) {
    let len = display_width(text).min(cols);
    let padding = cols.saturating_sub(len) / 2;
    let shown: String = text.chars().take(cols).collect();
    print!("{}", " ".repeat(padding));
    print!("{shown}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices with exclusive end. After each
/// highlighted section the `restore` sequence is printed so the rest of the
/// cell keeps its row colors. Selected rows skip highlighting entirely.
///
/// # Example
///
/// ```rust
/// use countryscope::ui::helpers::render_highlighted_text;
/// use countryscope::ui::Theme;
///
/// let theme = Theme::default();
/// render_highlighted_text("Kenya", &[(0, 3)], &theme, false, "");
/// ```
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
    restore: &str,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        let normal_section: String = chars[current_pos..start].iter().collect();
        print!("{normal_section}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{restore}");

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
