//! Search bar component renderer.

use crate::ui::helpers::{display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Blank columns on each side of the box.
const SEARCH_BOX_MARGIN: usize = 5;

/// Prints one row of the box: `left`, `inner`, `right`, all in `border` except
/// `inner`, which is drawn in `text` when given.
fn frame_row(row: usize, border: &str, left: char, inner: &str, right: char, text: Option<&str>) {
    position_cursor(row, 1);
    print!("{}{}{left}", " ".repeat(SEARCH_BOX_MARGIN), Theme::fg(border));
    match text {
        Some(color) => print!("{}{inner}{}", Theme::fg(color), Theme::fg(border)),
        None => print!("{inner}"),
    }
    print!("{right}{}", Theme::reset());
}

/// Renders the 3-line search box at `row` and returns `row + 3`.
///
/// ```text
/// [margin] ┌─────────────┐ [margin]
/// [margin] │ Search: ... │ [margin]
/// [margin] └─────────────┘ [margin]
/// ```
///
/// While the query is being edited a block cursor follows it; when focus is
/// on the results the border is dimmed.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let inner_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2 + 2);
    let border = if search.focused {
        theme.colors.search_bar_border.as_str()
    } else {
        theme.colors.border.as_str()
    };
    let rule = "─".repeat(inner_width);

    let cursor = if search.focused { "█" } else { "" };
    let mut line = truncate_to_width(&format!(" Search: {}{cursor}", search.query), inner_width);
    line.push_str(&" ".repeat(inner_width.saturating_sub(display_width(&line))));

    frame_row(row, border, '┌', &rule, '┐', None);
    frame_row(row + 1, border, '│', &line, '│', Some(&theme.colors.text_normal));
    frame_row(row + 2, border, '└', &rule, '┘', None);

    row + 3
}
