//! Country detail panel.
//!
//! ```text
//!   ★ Kenya
//!
//!   Official name   Republic of Kenya
//!   Capital         Nairobi
//!   ...
//! ```

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailPanel;

const LABEL_WIDTH: usize = 16;
const INDENT: usize = 2;

/// Renders the detail panel from `row`, stopping before `last_row`.
pub fn render_detail(row: usize, last_row: usize, detail: &DetailPanel, theme: &Theme, cols: usize) {
    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(INDENT));
    if detail.is_favorite {
        print!("{}★ ", Theme::fg(&theme.colors.favorite_fg));
    }
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("{}", detail.name);
    print!("{}", Theme::reset());

    let value_width = cols.saturating_sub(INDENT + LABEL_WIDTH);
    let mut current_row = row + 3;
    for (label, value) in &detail.fields {
        if current_row >= last_row {
            break;
        }
        position_cursor(current_row, 1);
        print!("{}", " ".repeat(INDENT));
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print_padded(label, LABEL_WIDTH);
        print!("{}", Theme::fg(&theme.colors.text_normal));
        let shown: String = value.chars().take(value_width).collect();
        print!("{shown}");
        print!("{}", Theme::reset());
        current_row += 1;
    }
}
