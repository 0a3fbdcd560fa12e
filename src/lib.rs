//! Yakguk (약국): a Zellij plugin for finding pharmacies in Seoul.
//!
//! The plugin loads a pharmacy dataset once and lets the user narrow it with
//! free-text search, a region selector and a three-way status filter (all,
//! open now, night pharmacies), then browse the result as summary cards or
//! as clustered markers on a terminal map.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, request deadlines                │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Map Layer     │   │ Worker Layer  │
//! │ (ui/)         │   │ (map/)        │   │ (worker/)     │
//! │ - Cards, map  │   │ - Projection  │   │ - File load   │
//! │ - Theming     │   │ - Clustering  │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Storage & Infrastructure                   │
//! │  - Hours evaluation and filter pipeline (domain/)   │
//! │  - Lenient JSON dataset parsing (storage/)          │
//! │  - Sandbox paths (infrastructure/)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/yakguk.wasm" {
//!         data_file "~/pharmacy_data.json"
//!         location_url "http://ip-api.com/json"
//!         utc_offset "+09:00"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use yakguk::{handle_event, initialize, Config, Event};
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut state = initialize(&Config::default(), now);
//!
//! let (_, actions) = handle_event(&mut state, &Event::Start, now)?;
//! // The plugin shim executes `actions`: worker post, timers, web requests.
//! # Ok::<(), yakguk::YakgukError>(())
//! ```

pub mod app;
pub mod domain;
pub mod geolocation;
pub mod infrastructure;
pub mod map;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use domain::{Pharmacy, Result, YakgukError};
pub use ui::Theme;

use app::{AppSettings, DataSource, LocationSource, SEOUL_DISTRICTS};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use domain::clock::parse_utc_offset;
use domain::pharmacy::GeoPoint;
use geolocation::parse_home_location;
use infrastructure::resolve_host_path;
use std::collections::BTreeMap;

/// Upper bound for `request_timeout_secs` and `refresh_interval_secs` (one day).
const MAX_INTERVAL_SECS: u64 = 24 * 3600;

/// Korea Standard Time, the offset the dataset's hours are written in.
const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Plugin configuration parsed from Zellij's configuration system.
///
/// ```kdl
/// plugin location="file:/path/to/yakguk.wasm" {
///     data_file "~/pharmacy_data.json"
///     data_url "https://example.org/pharmacy_data.json"
///     location_url "http://ip-api.com/json"
///     home_location "37.5665,126.9780"
///     utc_offset "+09:00"
///     regions "강남구,서초구,송파구"
///     list_limit "50"
///     request_timeout_secs "10"
///     refresh_interval_secs "60"
///     theme "catppuccin-mocha"
///     theme_file "~/.config/yakguk/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset file as written on the host, e.g. `~/pharmacy_data.json`.
    pub data_file: String,

    /// Dataset URL; takes precedence over `data_file`.
    pub data_url: Option<String>,

    /// IP geolocation endpoint used by "locate me".
    pub location_url: Option<String>,

    /// Fixed position used when no `location_url` is set.
    pub home_location: Option<GeoPoint>,

    /// Offset applied to the system UTC time before evaluating hours.
    pub utc_offset: FixedOffset,

    /// Region tokens cycled by the region selector.
    pub regions: Vec<String>,

    pub list_limit: usize,
    pub request_timeout_secs: u64,
    pub refresh_interval_secs: u64,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Custom TOML theme file; see [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing filter directive. Default: `"info"`
    pub trace_level: String,

    /// Values that failed to parse and fell back to their defaults.
    ///
    /// Reported once tracing is up, since parsing happens before it.
    pub rejected: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: "~/pharmacy_data.json".to_string(),
            data_url: None,
            location_url: None,
            home_location: None,
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            regions: SEOUL_DISTRICTS.iter().map(ToString::to_string).collect(),
            list_limit: 50,
            request_timeout_secs: 10,
            refresh_interval_secs: 60,
            theme_name: None,
            theme_file: None,
            trace_level: "info".to_string(),
            rejected: Vec::new(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Every key is optional. Blank values count as absent; values that fail
    /// to parse keep the default and are recorded in `rejected`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use yakguk::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("regions".to_string(), "강남구, 서초구".to_string());
    /// map.insert("list_limit".to_string(), "20".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.regions, vec!["강남구", "서초구"]);
    /// assert_eq!(config.list_limit, 20);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let mut rejected = Vec::new();

        let get = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let mut number = |key: &str, default: u64, max: u64| -> u64 {
            match get(key).map(|v| v.parse::<u64>()) {
                None => default,
                Some(Ok(n)) if (1..=max).contains(&n) => n,
                Some(_) => {
                    rejected.push(format!("{key}: expected a whole number from 1 to {max}"));
                    default
                }
            }
        };

        let list_limit = number("list_limit", defaults.list_limit as u64, u64::MAX);
        let request_timeout_secs =
            number("request_timeout_secs", defaults.request_timeout_secs, MAX_INTERVAL_SECS);
        let refresh_interval_secs =
            number("refresh_interval_secs", defaults.refresh_interval_secs, MAX_INTERVAL_SECS);

        let utc_offset = match get("utc_offset") {
            None => defaults.utc_offset,
            Some(raw) => parse_utc_offset(&raw).unwrap_or_else(|| {
                rejected.push(format!("utc_offset: '{raw}' is not an offset like +09:00"));
                defaults.utc_offset
            }),
        };

        let home_location = get("home_location").and_then(|raw| {
            parse_home_location(&raw)
                .map_err(|e| rejected.push(e.to_string()))
                .ok()
        });

        let regions = get("regions")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.regions);

        Self {
            data_file: get("data_file").unwrap_or(defaults.data_file),
            data_url: get("data_url"),
            location_url: get("location_url"),
            home_location,
            utc_offset,
            regions,
            list_limit: usize::try_from(list_limit).unwrap_or(usize::MAX),
            request_timeout_secs,
            refresh_interval_secs,
            theme_name: get("theme"),
            theme_file: get("theme_file"),
            trace_level: get("trace_level").unwrap_or(defaults.trace_level),
            rejected,
        }
    }

    /// Runtime settings for the state machine.
    #[must_use]
    pub fn settings(&self) -> AppSettings {
        let data_source = self.data_url.as_ref().map_or_else(
            || DataSource::File(resolve_host_path(&self.data_file)),
            |url| DataSource::Url(url.clone()),
        );

        let location_source = match (&self.location_url, self.home_location) {
            (Some(url), _) => LocationSource::Url(url.clone()),
            (None, Some(point)) => LocationSource::Fixed(point),
            (None, None) => LocationSource::Disabled,
        };

        AppSettings {
            data_source,
            location_source,
            regions: self.regions.clone(),
            list_limit: self.list_limit,
            request_timeout_secs: self.request_timeout_secs,
            refresh_interval_secs: self.refresh_interval_secs,
        }
    }

    /// Resolves the configured theme, falling back to the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(resolve_host_path(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the initial application state from configuration.
///
/// Expects tracing to be initialized already so rejected configuration
/// values are reported.
pub fn initialize(config: &Config, now: NaiveDateTime) -> AppState {
    tracing::debug!("initializing yakguk plugin");

    for reason in &config.rejected {
        tracing::warn!(reason = %reason, "ignoring invalid configuration value");
    }

    AppState::new(config.settings(), config.theme(), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.data_file, "~/pharmacy_data.json");
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(config.regions.len(), 25);
        assert_eq!(config.list_limit, 50);
        assert!(config.rejected.is_empty());

        let settings = config.settings();
        assert_eq!(
            settings.data_source,
            DataSource::File(PathBuf::from("/host/pharmacy_data.json"))
        );
        assert_eq!(settings.location_source, LocationSource::Disabled);
    }

    #[test]
    fn data_url_takes_precedence() {
        let config = Config::from_zellij(&map(&[
            ("data_file", "/data/local.json"),
            ("data_url", "https://example.org/p.json"),
        ]));
        assert_eq!(
            config.settings().data_source,
            DataSource::Url("https://example.org/p.json".to_string())
        );
    }

    #[test]
    fn location_url_wins_over_home_location() {
        let both = Config::from_zellij(&map(&[
            ("location_url", "http://ip-api.com/json"),
            ("home_location", "37.5,127.0"),
        ]));
        assert!(matches!(both.settings().location_source, LocationSource::Url(_)));

        let home = Config::from_zellij(&map(&[("home_location", "37.5,127.0")]));
        assert_eq!(
            home.settings().location_source,
            LocationSource::Fixed(GeoPoint { lat: 37.5, lng: 127.0 })
        );
    }

    #[test]
    fn invalid_values_fall_back_and_are_recorded() {
        let config = Config::from_zellij(&map(&[
            ("list_limit", "0"),
            ("request_timeout_secs", "soon"),
            ("utc_offset", "KST"),
            ("home_location", "downtown"),
        ]));
        assert_eq!(config.list_limit, 50);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
        assert!(config.home_location.is_none());
        assert_eq!(config.rejected.len(), 4);
    }

    #[test]
    fn intervals_longer_than_a_day_are_rejected() {
        let config = Config::from_zellij(&map(&[
            ("request_timeout_secs", "99999999999999"),
            ("refresh_interval_secs", "86401"),
        ]));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.rejected.len(), 2);

        let day = Config::from_zellij(&map(&[("refresh_interval_secs", "86400")]));
        assert_eq!(day.refresh_interval_secs, 86_400);
        assert!(day.rejected.is_empty());
    }

    #[test]
    fn blank_values_count_as_absent() {
        let config = Config::from_zellij(&map(&[("data_url", "  "), ("regions", " , ")]));
        assert!(config.data_url.is_none());
        assert_eq!(config.regions.len(), 25);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config::from_zellij(&map(&[("theme", "no-such-theme")]));
        assert_eq!(config.theme().name, "catppuccin-mocha");

        let latte = Config::from_zellij(&map(&[("theme", "catppuccin-latte")]));
        assert_eq!(latte.theme().name, "catppuccin-latte");
    }
}
