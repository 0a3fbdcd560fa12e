//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! timer ticks, web responses and worker responses, translating them into
//! state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `MoveDown`, `MoveUp`, `Select`
//! - **Input**: `Char`, `Backspace`, `Escape`
//! - **Filters**: `SetMode`, `NextRegion`, `PreviousRegion`
//! - **Map**: `TogglePanel`, `ZoomIn`, `ZoomOut`, `Pan`, `Locate`
//! - **System**: `Start`, `Tick`, `WebResponse`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use yakguk::app::{AppSettings, AppState, Event, handle_event};
//! use yakguk::ui::Theme;
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut state = AppState::new(AppSettings::default(), Theme::default(), now);
//! let (_, actions) = handle_event(&mut state, &Event::Start, now)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::actions::{Action, RequestKind};
use super::modes::{InputMode, SearchFocus};
use crate::app::AppState;
use crate::domain::error::{Result, YakgukError};
use crate::domain::filter::FilterMode;
use crate::geolocation::parse_location_response;
use crate::storage::parse_dataset;
use crate::worker::WorkerResponse;
use chrono::NaiveDateTime;

/// Events triggered by user input, timers, web responses or the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the selection down by one card (wraps to top).
    MoveDown,
    /// Moves the selection up by one card (wraps to bottom).
    MoveUp,
    /// Hides the plugin pane.
    CloseFocus,
    /// Shows the selected record on the map with its popup open.
    Select,
    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Focuses the search results list (from typing mode).
    FocusResults,
    /// Exits search mode and clears the query.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Closes the popup, or clears the query and returns to normal mode.
    Escape,

    /// Selects a status filter.
    SetMode(FilterMode),
    NextRegion,
    PreviousRegion,

    /// Switches the body between the card list and the map.
    TogglePanel,
    ZoomIn,
    ZoomOut,
    /// Pans the map by whole steps; positive `dx` is east, positive `dy` south.
    Pan { dx: i32, dy: i32 },
    /// Asks for the user position and re-centers on it.
    Locate,

    /// Issues the startup requests once permissions are settled.
    Start,

    /// A timer fired; expires stale requests and refreshes statuses.
    Tick,

    /// Answer to a `FetchUrl` action.
    WebResponse {
        kind: RequestKind,
        request_id: u64,
        status: u16,
        body: Vec<u8>,
    },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Short name for spans; payload-carrying variants are not dumped.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveDown => "MoveDown",
            Self::MoveUp => "MoveUp",
            Self::CloseFocus => "CloseFocus",
            Self::Select => "Select",
            Self::SearchMode => "SearchMode",
            Self::FocusSearchBar => "FocusSearchBar",
            Self::FocusResults => "FocusResults",
            Self::ExitSearch => "ExitSearch",
            Self::Char(_) => "Char",
            Self::Backspace => "Backspace",
            Self::Escape => "Escape",
            Self::SetMode(_) => "SetMode",
            Self::NextRegion => "NextRegion",
            Self::PreviousRegion => "PreviousRegion",
            Self::TogglePanel => "TogglePanel",
            Self::ZoomIn => "ZoomIn",
            Self::ZoomOut => "ZoomOut",
            Self::Pan { .. } => "Pan",
            Self::Locate => "Locate",
            Self::Start => "Start",
            Self::Tick => "Tick",
            Self::WebResponse { .. } => "WebResponse",
            Self::WorkerResponse(_) => "WorkerResponse",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// `now` is the local wall-clock instant; the state moves to it before the
/// event is handled so every status evaluated in this pass agrees.
///
/// Returns whether a re-render is needed together with the actions to
/// execute in order.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for handlers that must
/// surface failures to the plugin shim.
#[allow(clippy::too_many_lines)]
pub fn handle_event(
    state: &mut AppState,
    event: &Event,
    now: NaiveDateTime,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    state.advance_clock(now);

    match event {
        Event::MoveDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::MoveUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Select => {
            if state.focus_selected() {
                if matches!(state.input_mode, InputMode::Search(_)) {
                    state.input_mode = InputMode::Normal;
                }
                return Ok((true, vec![]));
            }

            if state.selected_pharmacy().is_some() {
                tracing::debug!("selected record has no coordinates");
                return Ok((false, vec![]));
            }

            tracing::debug!("no record selected");
            if matches!(state.input_mode, InputMode::Search(_)) {
                clear_search(state);
                return Ok((true, vec![]));
            }
            Ok((false, vec![]))
        }
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.filter.query.is_empty() {
                state.input_mode = InputMode::Normal;
                return Ok((true, vec![]));
            }
            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.filter.query, "exiting search mode");
            clear_search(state);
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            state.filter.query.push(*c);
            tracing::trace!(query = %state.filter.query, "search query updated");
            state.refilter();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            state.filter.query.pop();
            state.refilter();
            Ok((true, vec![]))
        }
        Event::Escape => {
            if state.popup_open {
                state.popup_open = false;
                return Ok((true, vec![]));
            }
            clear_search(state);
            Ok((true, vec![]))
        }
        Event::SetMode(mode) => {
            if state.filter.mode == *mode {
                return Ok((false, vec![]));
            }
            tracing::debug!(mode = mode.label(), "status filter changed");
            state.set_mode(*mode);
            Ok((true, vec![]))
        }
        Event::NextRegion => {
            state.cycle_region(true);
            tracing::debug!(region = state.region_label(), "region changed");
            Ok((true, vec![]))
        }
        Event::PreviousRegion => {
            state.cycle_region(false);
            tracing::debug!(region = state.region_label(), "region changed");
            Ok((true, vec![]))
        }
        Event::TogglePanel => {
            state.panel = state.panel.toggled();
            state.popup_open = false;
            Ok((true, vec![]))
        }
        Event::ZoomIn => Ok((state.map_view.zoom_in(), vec![])),
        Event::ZoomOut => Ok((state.map_view.zoom_out(), vec![])),
        Event::Pan { dx, dy } => {
            state.map_view.pan(*dx, *dy);
            Ok((true, vec![]))
        }
        Event::Locate => Ok(state.begin_locate()),
        Event::Start => {
            if state.started {
                return Ok((false, vec![]));
            }
            state.started = true;
            tracing::info!("starting: loading dataset and locating user");

            let mut actions = state.begin_dataset_load();
            let (_, locate_actions) = state.begin_locate();
            actions.extend(locate_actions);
            actions.push(state.arm_refresh());
            Ok((true, actions))
        }
        Event::Tick => {
            let mut changed = state.expire_requests();
            let mut actions = vec![];
            if let Some(timer) = state.timer_fired() {
                tracing::debug!("refreshing open status");
                changed = true;
                actions.push(timer);
            }
            Ok((changed, actions))
        }
        Event::WebResponse {
            kind,
            request_id,
            status,
            body,
        } => {
            if !state.settle_request(*kind, *request_id) {
                return Ok((false, vec![]));
            }

            let outcome = if *status >= 400 {
                Err(YakgukError::Http { status: *status })
            } else {
                Ok(body.as_slice())
            };

            match kind {
                RequestKind::Dataset => {
                    match outcome.and_then(parse_dataset) {
                        Ok(pharmacies) => state.dataset_loaded(pharmacies),
                        Err(e) => state.dataset_failed(e.to_string()),
                    }
                    Ok((true, vec![]))
                }
                RequestKind::Location => match outcome.and_then(parse_location_response) {
                    Ok(point) => {
                        state.apply_location(point);
                        Ok((true, vec![]))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "locate failed");
                        Ok((false, vec![]))
                    }
                },
            }
        }
        Event::WorkerResponse(response) => match response {
            WorkerResponse::DatasetLoaded {
                request_id,
                pharmacies,
            } => {
                if !state.settle_request(RequestKind::Dataset, *request_id) {
                    return Ok((false, vec![]));
                }
                state.dataset_loaded(pharmacies.clone());
                Ok((true, vec![]))
            }
            WorkerResponse::Error {
                request_id,
                message,
            } => {
                if !state.settle_request(RequestKind::Dataset, *request_id) {
                    return Ok((false, vec![]));
                }
                state.dataset_failed(message.clone());
                Ok((true, vec![]))
            }
        },
    }
}

fn clear_search(state: &mut AppState) {
    state.input_mode = InputMode::Normal;
    state.filter.query.clear();
    state.refilter();
}
