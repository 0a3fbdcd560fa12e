//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the Yakguk library and
//! the Zellij plugin system. It implements `ZellijPlugin`, registers the
//! dataset worker, and turns library actions into Zellij API calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling, web requests
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  YakgukWorker    │   │  ← Dataset file loading
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `CustomMessage`, `WebRequestResult`, `Timer` events
//! 3. **Start**: Once permissions are settled, load the dataset and locate the user
//! 4. **Tick**: Timers expire overdue requests and refresh open status
//! 5. **Update**: Handle events, delegate to library layer
//! 6. **Render**: Call library render function
//!
//! # Event Mapping
//!
//! - `Key(..)` → navigation, search, filter and map events
//! - `PermissionRequestResult` → `Event::Start`
//! - `Timer` → `Event::Tick`
//! - `WebRequestResult` → `Event::WebResponse` (routed by its context)
//! - `CustomMessage` → `Event::WorkerResponse`
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! In normal mode:
//! - `j`/`k`: Move selection (`Down`/`Up` too, except on the map where arrows pan)
//! - `Left`/`Right`/`Up`/`Down`: Pan the map
//! - `Enter`: Show the selected pharmacy on the map
//! - `/`: Enter search mode
//! - `a`/`o`/`n`: All, open now, night pharmacies
//! - `r`/`R`: Next/previous region
//! - `Tab`: Toggle list and map
//! - `+`/`=`/`-`: Zoom
//! - `l`: Locate me
//! - `Esc`: Close popup, then clear search
//! - `q`: Close plugin
//!
//! In search mode:
//! - Characters: Type into the query
//! - `Enter`: Move focus to results, or select when already there
//! - `/`: Return to search input
//! - `Esc`: Exit search

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use yakguk::app::{Panel, RequestKind};
use yakguk::domain::clock::{Clock, SystemClock};
use yakguk::domain::FilterMode;
use yakguk::worker::{WorkerMessage, WorkerResponse, YakgukWorker};
use yakguk::{handle_event, Action, Config, Event, InputMode, SearchFocus};

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(YakgukWorker, yakguk_worker, YAKGUK_WORKER);

/// Web request context key naming the request kind.
const CONTEXT_KIND: &str = "kind";

/// Web request context key carrying the request id.
const CONTEXT_REQUEST_ID: &str = "request_id";

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns: the worker
/// name and the clock that feeds every event.
struct State {
    /// Core application state from library layer.
    app: yakguk::AppState,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,

    clock: SystemClock,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        let clock = SystemClock::new(default_config.utc_offset);
        Self {
            app: yakguk::initialize(&default_config, clock.now()),
            worker_name: "yakguk".to_string(),
            clock,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// Parses configuration, initializes tracing and application state,
    /// requests permissions and subscribes to events. Nothing is fetched
    /// until the permission result arrives.
    ///
    /// # Permissions
    ///
    /// - `WebAccess`: Dataset URL and geolocation endpoint
    /// - `FullHdAccess`: Dataset file and trace file under the host root
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        yakguk::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            data_file = %config.data_file,
            data_url = ?config.data_url,
            location_url = ?config.location_url,
            "parsed configuration"
        );
        self.clock = SystemClock::new(config.utc_offset);
        self.app = yakguk::initialize(&config, self.clock.now());

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess, PermissionType::FullHdAccess]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
            EventType::WebRequestResult,
            EventType::Timer,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to
    /// `handle_event`, and executes resulting actions. Returns `true` if the
    /// UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_result_event(status, body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::Timer(_) => Event::Tick,
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                Self::map_permission_result(permissions)
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event, self.clock.now()) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        yakguk::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::MoveDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::MoveUp);
        }

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Self::map_typing_key(key),
            InputMode::Search(SearchFocus::Navigating) => Self::map_navigating_key(key),
            InputMode::Normal => self.map_normal_key(key),
        }
    }

    fn map_typing_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Esc => Event::ExitSearch,
            BareKey::Enter => Event::FocusResults,
            BareKey::Down => Event::MoveDown,
            BareKey::Up => Event::MoveUp,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_navigating_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Esc => Event::ExitSearch,
            BareKey::Enter => Event::Select,
            BareKey::Char('/') => Event::FocusSearchBar,
            BareKey::Down | BareKey::Char('j') => Event::MoveDown,
            BareKey::Up | BareKey::Char('k') => Event::MoveUp,
            BareKey::Backspace => Event::Backspace,
            _ => return None,
        })
    }

    fn map_normal_key(&self, key: &KeyWithModifier) -> Option<Event> {
        let on_map = self.app.panel == Panel::Map;

        Some(match key.bare_key {
            BareKey::Char('j') => Event::MoveDown,
            BareKey::Char('k') => Event::MoveUp,
            BareKey::Down if on_map => Event::Pan { dx: 0, dy: 1 },
            BareKey::Up if on_map => Event::Pan { dx: 0, dy: -1 },
            BareKey::Left if on_map => Event::Pan { dx: -1, dy: 0 },
            BareKey::Right if on_map => Event::Pan { dx: 1, dy: 0 },
            BareKey::Down => Event::MoveDown,
            BareKey::Up => Event::MoveUp,
            BareKey::Enter => Event::Select,
            BareKey::Esc => Event::Escape,
            BareKey::Tab => Event::TogglePanel,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('a') => Event::SetMode(FilterMode::All),
            BareKey::Char('o') => Event::SetMode(FilterMode::OpenOnly),
            BareKey::Char('n') => Event::SetMode(FilterMode::NightOnly),
            BareKey::Char('r') => Event::NextRegion,
            BareKey::Char('R') => Event::PreviousRegion,
            BareKey::Char('+' | '=') => Event::ZoomIn,
            BareKey::Char('-') => Event::ZoomOut,
            BareKey::Char('l') => Event::Locate,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    /// Starts the plugin whatever the permission outcome.
    ///
    /// Without permissions the requests fail and surface through the normal
    /// failure path.
    fn map_permission_result(permissions: PermissionStatus) -> Event {
        match permissions {
            PermissionStatus::Granted => tracing::debug!("permissions granted - starting"),
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - dataset and location requests will fail");
            }
        }
        Event::Start
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message != self.worker_name {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match WorkerResponse::from_payload(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Maps a web request result back to the request that issued it.
    fn map_web_result_event(
        status: u16,
        body: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        let kind = context.get(CONTEXT_KIND).and_then(|k| RequestKind::parse(k));
        let request_id = context
            .get(CONTEXT_REQUEST_ID)
            .and_then(|id| id.parse::<u64>().ok());

        tracing::debug!(status, body_len = body.len(), kind = ?kind, request_id = ?request_id, "web request result");

        match (kind, request_id) {
            (Some(kind), Some(request_id)) => Some(Event::WebResponse {
                kind,
                request_id,
                status,
                body,
            }),
            _ => {
                tracing::warn!(context = ?context, "web request result without routing context");
                None
            }
        }
    }

    /// Posts a message to the worker thread.
    ///
    /// Serializes the message as JSON and sends via Zellij's IPC system.
    /// Serialization errors are logged, not propagated.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// # Actions
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `PostToWorker`: Send IPC message to worker thread
    /// - `FetchUrl`: GET request tagged with its kind and id
    /// - `ScheduleTimer`: One-shot timer delivered as `Timer`
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(ref message) => {
                self.post_worker_message(message);
            }
            Action::FetchUrl {
                kind,
                request_id,
                ref url,
            } => {
                let context = BTreeMap::from([
                    (CONTEXT_KIND.to_string(), kind.as_str().to_string()),
                    (CONTEXT_REQUEST_ID.to_string(), request_id.to_string()),
                ]);
                web_request(url, HttpVerb::Get, BTreeMap::new(), Vec::new(), context);
            }
            Action::ScheduleTimer { secs } => set_timeout(*secs),
        }
    }
}
