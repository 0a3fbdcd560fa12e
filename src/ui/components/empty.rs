//! Empty state component renderer.

use crate::ui::helpers::print_centered;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the no-results message two rows into the body.
///
/// ```text
/// [2 blank lines]
/// MESSAGE
/// subtitle
/// ```
pub fn render_empty_state(body_row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    print_centered(body_row + 2, &empty.message, &Theme::fg(&theme.colors.empty_state_fg), cols);

    let subtitle_style = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    print_centered(body_row + 3, &empty.subtitle, &subtitle_style, cols);
}
