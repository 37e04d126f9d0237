//! Region and language picker list.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PickerPanel;

const INDENT: usize = 4;
const OPTION_WIDTH: usize = 24;

/// Renders the picker title and options from `row`.
pub fn render_picker(row: usize, picker: &PickerPanel, theme: &Theme) {
    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(INDENT));
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("{}", picker.title);
    print!("{}", Theme::reset());

    for (idx, option) in picker.options.iter().enumerate() {
        position_cursor(row + 3 + idx, 1);
        print!("{}", " ".repeat(INDENT));
        if idx == picker.selected_index {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        print_padded(&format!(" {option}"), OPTION_WIDTH);
        print!("{}", Theme::reset());
    }
}
