//! Composable UI component renderers.
//!
//! Each component draws one part of the screen at an absolute row and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with result counts
//! - [`filters`]: Status filter tabs, region and active panel
//! - [`search`]: Search input box
//! - [`cards`]: Two-row pharmacy summary cards
//! - [`map`]: Clustered marker map with status line
//! - [`popup`]: Detail box drawn over the map
//! - [`overlay`]: Loading and failure message
//! - [`empty`]: No-results message
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Filter bar]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Body: overlay | empty | cards | map]
//! [Border]
//! [Footer]
//! ```

mod cards;
mod empty;
mod filters;
mod footer;
mod header;
mod map;
mod overlay;
mod popup;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, UIViewModel};

use cards::render_cards;
use empty::render_empty_state;
use filters::render_filter_bar;
use footer::render_footer;
use header::render_header;
use map::render_map;
use overlay::render_overlay;
use search::render_search_bar;

/// Renders a horizontal border line at the specified row.
///
/// Returns the next available row position (row + 1).
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Blanks `count` rows starting at `row`.
fn clear_rows(row: usize, count: usize, cols: usize) {
    for offset in 0..count {
        position_cursor(row + offset, 1);
        print!("{}", " ".repeat(cols));
    }
}

/// Renders the full screen layout for a view model.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_filter_bar(current_row, &vm.filter_bar, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);
    let body_rows = border_row.saturating_sub(current_row);

    clear_rows(current_row, body_rows, cols);
    match &vm.body {
        BodyView::Overlay(overlay) => render_overlay(current_row, body_rows, overlay, theme, cols),
        BodyView::Empty(empty) => render_empty_state(current_row, empty, theme, cols),
        BodyView::List(list) => render_cards(current_row, body_rows, list, theme, cols),
        BodyView::Map(map) => render_map(current_row, map, theme, cols),
    }

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}
