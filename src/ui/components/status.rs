//! One-line status message under the header.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatusLine;

/// Renders the status row; a blank line when there is nothing to say.
pub fn render_status(row: usize, status: Option<&StatusLine>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    match status {
        Some(status) => {
            let color = if status.is_error {
                &theme.colors.error_fg
            } else {
                &theme.colors.text_dim
            };
            print!("{}", Theme::fg(color));
            let message: String = format!(" {}", status.message).chars().take(cols).collect();
            print_padded(&message, cols);
            print!("{}", Theme::reset());
        }
        None => print!("{}", " ".repeat(cols)),
    }
    row + 1
}
