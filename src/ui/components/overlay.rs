//! Loading and load-failure overlay.

use crate::ui::helpers::print_centered;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::OverlayInfo;

/// Renders the overlay message centered in the body area.
pub fn render_overlay(body_row: usize, body_rows: usize, overlay: &OverlayInfo, theme: &Theme, cols: usize) {
    let style = if overlay.is_error {
        format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.error_fg))
    } else {
        Theme::fg(&theme.colors.empty_state_fg)
    };

    print_centered(body_row + body_rows / 2, &overlay.message, &style, cols);
}
