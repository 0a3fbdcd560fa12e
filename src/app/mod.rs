//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin runtime (main.rs) and the
//! domain/map/storage/worker layers. It holds the single mutable state of the
//! plugin and decides, per event, what changes and which side effects run.
//!
//! # Architecture
//!
//! ```text
//! Keys / Timers / Web results → Events → Event Handler → State Mutations → Actions
//!                                             ↑                              ↓
//!                                             └──── Worker / Web Responses ──┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input, panel and load state types
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::{Action, RequestKind};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, LoadState, Panel, SearchFocus};
pub use state::{AppSettings, AppState, DataSource, LocationSource, PendingRequest, SEOUL_DISTRICTS};
