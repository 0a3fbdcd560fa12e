//! Header component renderer.

use crate::ui::helpers::{display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title centered with the result counts right-aligned.
///
/// The counts are dropped on panes too narrow to hold both.
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [padding] counts
/// ```
///
/// Returns the next available row position (row + 1).
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate_to_width(&header.title, cols);
    let title_len = display_width(&title);
    let padding = cols.saturating_sub(title_len) / 2;

    let counts = format!("{} ", header.counts);
    let counts_len = display_width(&counts);
    let show_counts = padding + title_len + 1 + counts_len <= cols;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");

    if show_counts {
        print!("{}", " ".repeat(cols - padding - title_len - counts_len));
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        if let Some(bg) = &theme.colors.header_bg {
            print!("{}", Theme::bg(bg));
        }
        print!("{counts}");
    } else {
        print!("{}", " ".repeat(cols.saturating_sub(padding + title_len)));
    }

    print!("{}", Theme::reset());
    row + 1
}
