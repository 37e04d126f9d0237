//! Top-level rendering entry point.
//!
//! Rendering is two steps: compute a [`UIViewModel`](crate::ui::UIViewModel)
//! from [`AppState`], then hand it to the components. The theme follows the
//! session's dark-mode flag.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Prints ANSI-styled output with `print!`. Does not clear the screen; Zellij
/// hands the plugin a fresh frame on every render.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, state.theme(), cols, rows);
}
