//! Map panel renderer.
//!
//! Markers arrive already clustered and placed on cells. Pins are drawn as
//! `●`, clusters as their member count, the user position as `◎`. The
//! selected marker is drawn in selection colors.

use super::popup::render_popup;
use crate::ui::helpers::{position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{MapGlyph, MapPanelView};

/// Renders the map area, its popup and the status line below it.
pub fn render_map(row: usize, map: &MapPanelView, theme: &Theme, cols: usize) {
    for glyph in &map.glyphs {
        let (col, glyph_row) = glyph.cell();
        position_cursor(row + glyph_row, col + 1);

        if glyph.is_selected() {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        }

        match glyph {
            MapGlyph::Pin { .. } => {
                if !glyph.is_selected() {
                    print!("{}", Theme::fg(&theme.colors.marker));
                }
                print!("●");
            }
            MapGlyph::Cluster { count, .. } => {
                if !glyph.is_selected() {
                    print!("{}", Theme::bold());
                    print!("{}", Theme::fg(&theme.colors.cluster));
                }
                let label = count.to_string();
                let room = cols.saturating_sub(col);
                print!("{}", truncate_to_width(&label, room));
            }
            MapGlyph::UserLocation { .. } => {
                print!("{}", Theme::bold());
                print!("{}", Theme::fg(&theme.colors.user_location));
                print!("◎");
            }
        }
        print!("{}", Theme::reset());
    }

    if let Some(popup) = &map.popup {
        render_popup(row, popup, theme, cols);
    }

    position_cursor(row + map.height, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(" {}", truncate_to_width(&map.status, cols.saturating_sub(1)));
    print!("{}", Theme::reset());
}
