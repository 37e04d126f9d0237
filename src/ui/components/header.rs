//! Header component renderer.

use crate::ui::helpers::{display_width, position_cursor, print_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title centered and bold, with the context right-aligned in dim
/// text on the same row. Returns the next row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print_centered(&header.title, cols);
    print!("{}", Theme::reset());

    let context_len = display_width(&header.context);
    let title_end = (cols + display_width(&header.title)) / 2;
    if !header.context.is_empty() && context_len + 2 + title_end <= cols {
        position_cursor(row, cols - context_len);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", header.context);
        print!("{}", Theme::reset());
    }

    row + 1
}
