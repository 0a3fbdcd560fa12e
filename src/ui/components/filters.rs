//! Filter bar component renderer.
//!
//! One row holding the three status tabs, the region selection and the
//! active panel.

use crate::app::modes::Panel;
use crate::ui::helpers::{display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterBarInfo;

/// Renders the filter bar at the specified row.
///
/// The active tab is drawn with selection colors; the others are dimmed.
///
/// ```text
///  [a] All  [o] Open now  [n] Night   Region: 강남구 (r/R)         List | Map
/// ```
///
/// Returns the next available row position (row + 1).
pub fn render_filter_bar(row: usize, bar: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let mut used = 0;

    print!(" ");
    used += 1;

    for tab in &bar.modes {
        let label = format!("[{}] {}", tab.key, tab.label);
        if tab.active {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{label}");
        print!("{}  ", Theme::reset());
        used += display_width(&label) + 2;
    }

    let region = format!(" Region: {} (r/R)", bar.region);
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{region}");
    used += display_width(&region);

    let panels = match bar.panel {
        Panel::List => ("List", "Map"),
        Panel::Map => ("Map", "List"),
    };
    let panel_label = format!("{} | {} ", panels.0, panels.1);
    let panel_len = display_width(&panel_label);

    if used + panel_len < cols {
        print!("{}", " ".repeat(cols - used - panel_len));
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.header_fg));
        print!("{}", panels.0);
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" | {} ", panels.1);
    }

    print!("{}", Theme::reset());
    row + 1
}
