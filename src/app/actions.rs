//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never calls Zellij APIs itself. It returns a
//! `Vec<Action>` and the plugin shim in `main.rs` performs them in order:
//! posting to the worker, issuing web requests, arming timers, or hiding the
//! plugin pane.
//!
//! # Example
//!
//! ```rust
//! use yakguk::app::{Action, RequestKind};
//!
//! let actions = vec![
//!     Action::FetchUrl {
//!         kind: RequestKind::Location,
//!         request_id: 1,
//!         url: "https://ipapi.co/json".to_string(),
//!     },
//!     Action::ScheduleTimer { secs: 10.0 },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;
use serde::{Deserialize, Serialize};

/// What an outstanding request is for.
///
/// Carried through the Zellij web request context so the response can be
/// routed back to the right handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Dataset,
    Location,
}

impl RequestKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dataset" => Some(Self::Dataset),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Issues an HTTP GET through the Zellij web request API.
    ///
    /// The response comes back as a `WebRequestResult` event tagged with
    /// `kind` and `request_id`.
    FetchUrl {
        kind: RequestKind,
        request_id: u64,
        url: String,
    },

    /// Arms a one-shot timer; its expiry arrives as a tick event.
    ScheduleTimer {
        /// Delay in seconds.
        secs: f64,
    },
}
