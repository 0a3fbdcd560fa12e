//! Pharmacy card list renderer.
//!
//! Each card takes two rows:
//!
//! ```text
//! ▌ Onnuri Pharmacy 온누리약국                       [Open] [Night]
//! ▌   12 Teheran-ro, Gangnam-gu, Seoul
//! ```
//!
//! The selected card is drawn with selection colors across the full width.
//! Records without coordinates carry a dimmed `no map` tag.

use crate::domain::hours::OpenStatus;
use crate::ui::helpers::{self, display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CardItem, ListView};

/// Renders the visible cards and the truncation notice.
pub fn render_cards(row: usize, body_rows: usize, list: &ListView, theme: &Theme, cols: usize) {
    let mut current_row = row;
    let last_row = row + body_rows;

    for card in &list.cards {
        if current_row + 2 > last_row {
            break;
        }
        current_row = render_card(current_row, card, theme, cols);
    }

    if let Some(notice) = &list.notice {
        position_cursor(last_row.saturating_sub(1).max(row), 1);
        print!("{}", Theme::dim());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" {}", truncate_to_width(notice, cols.saturating_sub(1)));
        print!("{}", Theme::reset());
    }
}

fn badges(card: &CardItem) -> Vec<(&'static str, bool)> {
    let status = match card.status {
        OpenStatus::Open => "[Open]",
        OpenStatus::Closed => "[Closed]",
        OpenStatus::Unknown => "[Hours N/A]",
    };
    let mut badges = vec![(status, false)];
    if card.night {
        badges.push(("[Night]", true));
    }
    if !card.mappable {
        badges.push(("no map", false));
    }
    badges
}

/// Renders one card and returns the row after it.
fn render_card(row: usize, card: &CardItem, theme: &Theme, cols: usize) -> usize {
    let base = || {
        if card.is_selected {
            format!(
                "{}{}",
                Theme::fg(&theme.colors.selection_fg),
                Theme::bg(&theme.colors.selection_bg)
            )
        } else {
            Theme::fg(&theme.colors.text_normal)
        }
    };

    let badges = badges(card);
    let badge_width: usize = badges.iter().map(|(b, _)| b.len() + 1).sum();
    let name_room = cols.saturating_sub(badge_width + 3);

    let name = truncate_to_width(&card.name, name_room);
    let name_kr = if card.name_kr.is_empty() || card.name_kr == card.name {
        String::new()
    } else {
        truncate_to_width(
            &format!(" {}", card.name_kr),
            name_room.saturating_sub(display_width(&name)),
        )
    };

    position_cursor(row, 1);
    print!("{}", base());
    print!("{}", if card.is_selected { "▌ " } else { "  " });
    print!("{}", Theme::bold());
    helpers::render_highlighted_text(&name, &card.highlight_ranges, theme, card.is_selected);
    print!("{}", Theme::reset());
    print!("{}", base());
    print!("{}", Theme::dim());
    print!("{name_kr}");
    print!("{}", Theme::reset());
    print!("{}", base());

    let used = 2 + display_width(&name) + display_width(&name_kr);
    print!("{}", " ".repeat(cols.saturating_sub(used + badge_width)));
    for (badge, is_night) in &badges {
        let color: &str = if *is_night {
            &theme.colors.night_badge
        } else if badge.starts_with('[') {
            theme.colors.status(card.status)
        } else {
            &theme.colors.text_dim
        };
        print!("{}", Theme::fg(color));
        print!("{badge} ");
    }
    print!("{}", Theme::reset());

    let address = truncate_to_width(&card.address, cols.saturating_sub(4));
    position_cursor(row + 1, 1);
    print!("{}", base());
    print!("{}", if card.is_selected { "▌   " } else { "    " });
    if !card.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{address}");
    print!("{}", " ".repeat(cols.saturating_sub(4 + display_width(&address))));
    print!("{}", Theme::reset());

    row + 2
}
