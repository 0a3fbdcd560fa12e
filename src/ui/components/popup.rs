//! Detail popup drawn over the map.

use crate::domain::hours::OpenStatus;
use crate::map::Popup;
use crate::ui::helpers::{display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;

const MAX_POPUP_WIDTH: usize = 48;

/// Popup lines, first line bold.
fn popup_lines(popup: &Popup) -> Vec<String> {
    let status = match popup.status {
        OpenStatus::Open => "Open now",
        OpenStatus::Closed => "Closed",
        OpenStatus::Unknown => "Hours unavailable",
    };
    let mut status_line = format!("Status: {status}");
    if popup.night {
        status_line.push_str(" · Night pharmacy");
    }

    vec![
        popup.name_en.clone(),
        popup.name_kr.clone(),
        popup.address_en.clone(),
        format!("Phone: {}", popup.phone),
        status_line,
    ]
}

/// Renders the popup box in the top-right corner of the map area.
pub fn render_popup(map_row: usize, popup: &Popup, theme: &Theme, cols: usize) {
    let width = cols.saturating_sub(2).min(MAX_POPUP_WIDTH);
    if width < 8 {
        return;
    }
    let inner = width - 2;
    let left = cols.saturating_sub(width) + 1;

    position_cursor(map_row, left);
    print!("{}", Theme::fg(&theme.colors.popup_border));
    print!("┌{}┐", "─".repeat(inner));

    let lines = popup_lines(popup);
    for (offset, line) in lines.iter().enumerate() {
        let text = truncate_to_width(line, inner.saturating_sub(1));
        position_cursor(map_row + 1 + offset, left);
        print!("{}", Theme::fg(&theme.colors.popup_border));
        print!("│");
        match offset {
            0 => print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg)),
            4 => print!("{}", Theme::fg(theme.colors.status(popup.status))),
            _ => print!("{}", Theme::fg(&theme.colors.text_normal)),
        }
        print!(" {text}");
        print!("{}", " ".repeat(inner.saturating_sub(1 + display_width(&text))));
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.popup_border));
        print!("│");
    }

    position_cursor(map_row + 1 + lines.len(), left);
    print!("└{}┘", "─".repeat(inner));
    print!("{}", Theme::reset());
}
