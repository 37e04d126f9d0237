//! Demo login form.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LoginPanel;

const INDENT: usize = 4;
const LABEL_WIDTH: usize = 11;

/// Renders the form from `row`. The focused field shows a cursor.
pub fn render_login(row: usize, login: &LoginPanel, theme: &Theme) {
    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(INDENT));
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("Sign in");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(INDENT));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("Any non-empty username and password will do.");
    print!("{}", Theme::reset());

    let fields = [
        ("Username", &login.username, login.username_focused),
        ("Password", &login.password_mask, !login.username_focused),
    ];
    for (offset, (label, value, focused)) in fields.into_iter().enumerate() {
        position_cursor(row + 4 + offset, 1);
        print!("{}", " ".repeat(INDENT));
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print_padded(label, LABEL_WIDTH);
        if focused {
            print!("{}", Theme::fg(&theme.colors.search_bar_border));
            print!("{value}_");
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
            print!("{value}");
        }
        print!("{}", Theme::reset());
    }

    if let Some(error) = &login.error {
        position_cursor(row + 7, 1);
        print!("{}", " ".repeat(INDENT));
        print!("{}", Theme::fg(&theme.colors.error_fg));
        print!("{error}");
        print!("{}", Theme::reset());
    }
}
