//! View model types representing renderable UI state.
//!
//! View models are immutable snapshots computed from application state via
//! `AppState::compute_viewmodel()` and consumed by the renderer. They carry no
//! business logic, only display-ready data: labels already formatted, statuses
//! already evaluated, markers already projected to terminal cells.
//!
//! # Example
//!
//! ```rust
//! use yakguk::ui::viewmodel::{BodyView, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
//! use yakguk::ui::viewmodel::FilterBarInfo;
//! use yakguk::app::Panel;
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "Pharmacies".to_string(), counts: "0 of 0 · All".to_string() },
//!     filter_bar: FilterBarInfo { modes: vec![], region: "All regions".to_string(), panel: Panel::List },
//!     search_bar: None,
//!     body: BodyView::Empty(EmptyState {
//!         message: "No pharmacies found with current filters.".to_string(),
//!         subtitle: String::new(),
//!     }),
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//! };
//! ```

use crate::app::modes::Panel;
use crate::domain::hours::OpenStatus;
use crate::map::Popup;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Status filter tabs and region selection.
    pub filter_bar: FilterBarInfo,

    /// Present only in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// What fills the space between the chrome rows.
    pub body: BodyView,

    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Result summary, e.g. `"12 of 4031 · Open now"`.
    pub counts: String,
}

/// One status filter tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTab {
    pub label: String,
    /// Key that selects this tab.
    pub key: char,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct FilterBarInfo {
    pub modes: Vec<ModeTab>,
    /// Selected region token, or "All regions".
    pub region: String,
    pub panel: Panel,
}

/// Search bar display information.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Current search query text.
    pub query: String,
    /// Whether keystrokes currently edit the query.
    pub focused: bool,
}

/// The body of the screen.
#[derive(Debug, Clone)]
pub enum BodyView {
    /// Loading indicator or load failure message.
    Overlay(OverlayInfo),
    /// The filters exclude every record.
    Empty(EmptyState),
    List(ListView),
    Map(MapPanelView),
}

#[derive(Debug, Clone)]
pub struct OverlayInfo {
    pub message: String,
    pub is_error: bool,
}

/// Empty state message display information.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// The visible window of summary cards.
#[derive(Debug, Clone)]
pub struct ListView {
    pub cards: Vec<CardItem>,

    /// Index of the selected card within `cards`.
    pub selected_index: usize,

    /// Truncation notice, shown when more records matched than are listed.
    pub notice: Option<String>,
}

/// Display information for one pharmacy card.
///
/// A card takes two rows: name with badges, then address.
#[derive(Debug, Clone)]
pub struct CardItem {
    pub name: String,
    pub name_kr: String,
    pub address: String,
    pub status: OpenStatus,
    pub night: bool,
    pub is_selected: bool,
    /// Whether the record has coordinates to show on the map.
    pub mappable: bool,

    /// Character ranges of `name` matching the search query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// One drawable item of the map, already placed on a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapGlyph {
    Pin {
        col: usize,
        row: usize,
        is_selected: bool,
    },
    Cluster {
        col: usize,
        row: usize,
        count: usize,
        is_selected: bool,
    },
    UserLocation {
        col: usize,
        row: usize,
    },
}

impl MapGlyph {
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        match self {
            Self::Pin { is_selected, .. } | Self::Cluster { is_selected, .. } => *is_selected,
            Self::UserLocation { .. } => false,
        }
    }

    /// Cell position as `(col, row)` within the map viewport.
    #[must_use]
    pub const fn cell(&self) -> (usize, usize) {
        match *self {
            Self::Pin { col, row, .. }
            | Self::Cluster { col, row, .. }
            | Self::UserLocation { col, row } => (col, row),
        }
    }
}

/// The map panel: a grid of glyphs, an optional popup and a status line.
#[derive(Debug, Clone)]
pub struct MapPanelView {
    pub width: usize,
    pub height: usize,
    pub glyphs: Vec<MapGlyph>,
    pub popup: Option<Popup>,
    /// Zoom and marker summary shown under the map.
    pub status: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}
