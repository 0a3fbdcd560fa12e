//! Input, panel and loading state types for the application.
//!
//! These enums form the small state machines that decide which keybindings
//! are active, which panel occupies the body of the screen, and whether the
//! loading overlay is shown.
//!
//! # State Machine
//!
//! The application operates in one of two input modes:
//! - **Normal**: navigation, filter toggles and panel commands
//! - **Search**: query entry with typing or result navigation focus
//!
//! Independently, the body shows one [`Panel`] and the dataset is in one
//! [`LoadState`].
//!
//! # Example
//!
//! ```rust
//! use yakguk::app::modes::{InputMode, Panel, SearchFocus};
//!
//! let input_mode = InputMode::Search(SearchFocus::Typing);
//! assert_eq!(Panel::List.toggled(), Panel::Map);
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query.
    Typing,

    /// Keystrokes move through the filtered results; `/` returns to typing.
    Navigating,
}

/// Current input handling mode.
///
/// Controls which keybindings are active and the footer hint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Default mode.
    ///
    /// Available keybindings: j/k (navigate), / (search), a/o/n (status
    /// filter), r/R (region), Tab (panel), l (locate), Enter (show on map),
    /// q (quit).
    Normal,

    /// Active search mode with focus state.
    Search(SearchFocus),
}

/// Which panel occupies the body of the plugin pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// Summary cards for the filtered list.
    #[default]
    List,

    /// Clustered marker map with the detail popup.
    Map,
}

impl Panel {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::List => Self::Map,
            Self::Map => Self::List,
        }
    }
}

/// Progress of the one-time dataset load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Request issued, no answer yet.
    #[default]
    Loading,

    /// Dataset loaded; the list and map show filtered results.
    Ready,

    /// Load failed; the overlay shows the fixed failure message.
    ///
    /// The inner string is the diagnostic, logged but never displayed.
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
