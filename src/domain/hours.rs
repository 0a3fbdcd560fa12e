//! Opening-hours evaluation: open/closed status and night-pharmacy detection.
//!
//! Operating hours arrive as a map from weekday abbreviation (`Sun`..`Sat`) to
//! either the literal `Closed` or a same-day window `"HH:mm - HH:mm"`. Both
//! evaluators here are pure functions of the hours and an explicit instant:
//!
//! - [`evaluate_status`] answers Open / Closed / Unknown
//! - [`is_night_pharmacy`] answers whether today's listed closing time is late
//!
//! Parsing is exposed separately ([`parse_window`], [`parse_clock_time`]) and
//! reports failures through [`HoursError`]. The evaluators fold those errors
//! into `Unknown` / `false`, so no malformed record can break a render.
//!
//! # Night heuristic
//!
//! A pharmacy counts as a night pharmacy when today's closing hour is at or
//! after 22 or before 6 (`"18:00 - 02:00"` rolls past midnight). Yesterday's
//! schedule is not consulted, so at 01:00 a pharmacy listed `"18:00 - 02:00"`
//! for the previous day is not reported as open. This is a known
//! simplification kept as documented behavior.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use yakguk::domain::hours::{evaluate_status, is_night_pharmacy, OpenStatus};
//!
//! let mut hours = BTreeMap::new();
//! hours.insert("Mon".to_string(), "09:00 - 23:00".to_string());
//!
//! // 2024-03-04 is a Monday.
//! let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(22, 30, 0).unwrap();
//! assert_eq!(evaluate_status(Some(&hours), now), OpenStatus::Open);
//! assert!(is_night_pharmacy(Some(&hours), now));
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Weekday abbreviations indexed from Sunday, matching the dataset keys.
pub const DAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Literal used by the dataset for a day without opening hours.
pub const CLOSED_LITERAL: &str = "Closed";

/// Separator between the opening and closing time of a window.
const WINDOW_SEPARATOR: &str = " - ";

/// Closing hours at or after this value mark a night pharmacy.
const NIGHT_CLOSE_FROM_HOUR: u32 = 22;

/// Closing hours before this value are read as past-midnight closings.
const NIGHT_CLOSE_BEFORE_HOUR: u32 = 6;

/// Per-weekday opening hours as stored in the dataset.
pub type OperatingHours = BTreeMap<String, String>;

/// Open/closed status derived from operating hours at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpenStatus {
    Open,
    Closed,
    /// No hours were supplied, or today's entry could not be parsed.
    Unknown,
}

impl OpenStatus {
    /// Badge text shown on cards and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a day entry fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    /// The entry has no `" - "` between opening and closing time.
    #[error("missing ' - ' separator in {0:?}")]
    MissingSeparator(String),

    /// One side is not a valid `HH:mm` time.
    #[error("invalid time {0:?}")]
    InvalidTime(String),
}

/// A time of day in whole minutes.
///
/// `24:00` is accepted as an end-of-day closing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Minutes elapsed since midnight.
    #[must_use]
    pub const fn minutes_since_midnight(self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// A same-day opening window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub open: ClockTime,
    pub close: ClockTime,
}

impl OpeningWindow {
    /// Whether `minutes` (since midnight) falls inside `[open, close]`.
    ///
    /// A window whose close precedes its open (`"18:00 - 02:00"`) contains no
    /// minute of the listed day.
    #[must_use]
    pub const fn contains(&self, minutes: u32) -> bool {
        minutes >= self.open.minutes_since_midnight()
            && minutes <= self.close.minutes_since_midnight()
    }
}

/// What the hours map says about one particular day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEntry<'a> {
    /// The day key is missing from the map.
    Missing,
    /// The day is explicitly marked `Closed`.
    Closed,
    /// The day has a raw window string, not yet parsed.
    Listed(&'a str),
}

/// Returns the dataset weekday key for `now` (`"Sun"`..`"Sat"`).
#[must_use]
pub fn day_abbreviation(now: NaiveDateTime) -> &'static str {
    DAY_ABBREVIATIONS[now.weekday().num_days_from_sunday() as usize]
}

/// Looks up the entry for the weekday of `now`.
#[must_use]
pub fn entry_for(hours: &OperatingHours, now: NaiveDateTime) -> DayEntry<'_> {
    match hours.get(day_abbreviation(now)).map(|s| s.trim()) {
        None | Some("") => DayEntry::Missing,
        Some(CLOSED_LITERAL) => DayEntry::Closed,
        Some(raw) => DayEntry::Listed(raw),
    }
}

/// Parses a single `HH:mm` time.
///
/// Hours may be one or two digits (`9:00` and `09:00` are equivalent); minutes
/// must be two digits. Hours run `0..=24`, and `24` is only valid as `24:00`.
///
/// # Errors
///
/// Returns [`HoursError::InvalidTime`] for anything else.
pub fn parse_clock_time(raw: &str) -> Result<ClockTime, HoursError> {
    let invalid = || HoursError::InvalidTime(raw.to_string());
    let trimmed = raw.trim();

    let (hour_str, minute_str) = trimmed.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if !all_digits(hour_str) || hour_str.len() > 2 || !all_digits(minute_str) || minute_str.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
        return Err(invalid());
    }

    Ok(ClockTime { hour, minute })
}

/// Parses a `"HH:mm - HH:mm"` window.
///
/// # Errors
///
/// - [`HoursError::MissingSeparator`] when `" - "` is absent
/// - [`HoursError::InvalidTime`] when either side is not a valid time
pub fn parse_window(raw: &str) -> Result<OpeningWindow, HoursError> {
    let (open, close) = raw
        .trim()
        .split_once(WINDOW_SEPARATOR)
        .ok_or_else(|| HoursError::MissingSeparator(raw.to_string()))?;

    Ok(OpeningWindow {
        open: parse_clock_time(open)?,
        close: parse_clock_time(close)?,
    })
}

/// Parses only the closing side of a window.
///
/// The night heuristic needs nothing else, so a garbled opening time does not
/// hide a readable closing time.
///
/// # Errors
///
/// Same as [`parse_window`], restricted to the closing side.
pub fn parse_close_time(raw: &str) -> Result<ClockTime, HoursError> {
    let (_, close) = raw
        .trim()
        .split_once(WINDOW_SEPARATOR)
        .ok_or_else(|| HoursError::MissingSeparator(raw.to_string()))?;
    parse_clock_time(close)
}

/// Decides whether a pharmacy is open at `now`.
///
/// - `hours` absent ⇒ [`OpenStatus::Unknown`]
/// - today's entry missing or `Closed` ⇒ [`OpenStatus::Closed`]
/// - today's window parses and contains the current minute ⇒ [`OpenStatus::Open`]
/// - today's window parses and does not contain it ⇒ [`OpenStatus::Closed`]
/// - today's window does not parse ⇒ [`OpenStatus::Unknown`]
#[must_use]
pub fn evaluate_status(hours: Option<&OperatingHours>, now: NaiveDateTime) -> OpenStatus {
    let Some(hours) = hours else {
        return OpenStatus::Unknown;
    };

    match entry_for(hours, now) {
        DayEntry::Missing | DayEntry::Closed => OpenStatus::Closed,
        DayEntry::Listed(raw) => match parse_window(raw) {
            Ok(window) => {
                let minutes = now.hour() * 60 + now.minute();
                if window.contains(minutes) {
                    OpenStatus::Open
                } else {
                    OpenStatus::Closed
                }
            }
            Err(e) => {
                tracing::trace!(entry = %raw, error = %e, "unparsable operating hours");
                OpenStatus::Unknown
            }
        },
    }
}

/// Decides whether today's listed closing time makes this a night pharmacy.
///
/// True when the closing hour is `>= 22` or `< 6`. False when hours are
/// absent, today is missing or `Closed`, or the closing time does not parse.
#[must_use]
pub fn is_night_pharmacy(hours: Option<&OperatingHours>, now: NaiveDateTime) -> bool {
    let Some(hours) = hours else {
        return false;
    };

    match entry_for(hours, now) {
        DayEntry::Missing | DayEntry::Closed => false,
        DayEntry::Listed(raw) => parse_close_time(raw).is_ok_and(|close| {
            close.hour >= NIGHT_CLOSE_FROM_HOUR || close.hour < NIGHT_CLOSE_BEFORE_HOUR
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// 2024-03-04 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn hours(pairs: &[(&str, &str)]) -> OperatingHours {
        pairs
            .iter()
            .map(|(day, entry)| ((*day).to_string(), (*entry).to_string()))
            .collect()
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        assert_eq!(day_abbreviation(sunday), "Sun");
        assert_eq!(day_abbreviation(monday_at(0, 0)), "Mon");
    }

    #[test]
    fn missing_hours_are_unknown_and_not_night() {
        assert_eq!(evaluate_status(None, monday_at(12, 0)), OpenStatus::Unknown);
        assert!(!is_night_pharmacy(None, monday_at(12, 0)));
    }

    #[test]
    fn explicitly_closed_day_is_closed() {
        let h = hours(&[("Mon", "Closed"), ("Tue", "09:00 - 18:00")]);
        assert_eq!(evaluate_status(Some(&h), monday_at(12, 0)), OpenStatus::Closed);
        assert!(!is_night_pharmacy(Some(&h), monday_at(12, 0)));
    }

    #[test]
    fn missing_day_key_is_closed() {
        let h = hours(&[("Tue", "09:00 - 18:00")]);
        assert_eq!(evaluate_status(Some(&h), monday_at(12, 0)), OpenStatus::Closed);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let h = hours(&[("Mon", "09:00 - 18:00")]);
        assert_eq!(evaluate_status(Some(&h), monday_at(9, 0)), OpenStatus::Open);
        assert_eq!(evaluate_status(Some(&h), monday_at(8, 59)), OpenStatus::Closed);
        assert_eq!(evaluate_status(Some(&h), monday_at(18, 0)), OpenStatus::Open);
        assert_eq!(evaluate_status(Some(&h), monday_at(18, 1)), OpenStatus::Closed);
    }

    #[test]
    fn malformed_entries_are_unknown() {
        for entry in ["09:00-18:00", "nine - six", "09:00 - ", "9 - 18", "09:0 - 18:00", "25:00 - 26:00"] {
            let h = hours(&[("Mon", entry)]);
            assert_eq!(
                evaluate_status(Some(&h), monday_at(12, 0)),
                OpenStatus::Unknown,
                "entry {entry:?}"
            );
        }
    }

    #[test]
    fn night_heuristic_uses_close_hour() {
        let late = hours(&[("Mon", "09:00 - 23:00")]);
        let early = hours(&[("Mon", "09:00 - 21:00")]);
        let past_midnight = hours(&[("Mon", "18:00 - 02:00")]);
        let now = monday_at(12, 0);

        assert!(is_night_pharmacy(Some(&late), now));
        assert!(!is_night_pharmacy(Some(&early), now));
        assert!(is_night_pharmacy(Some(&past_midnight), now));
    }

    #[test]
    fn night_heuristic_boundaries() {
        let now = monday_at(12, 0);
        assert!(is_night_pharmacy(Some(&hours(&[("Mon", "09:00 - 22:00")])), now));
        assert!(!is_night_pharmacy(Some(&hours(&[("Mon", "09:00 - 21:59")])), now));
        assert!(is_night_pharmacy(Some(&hours(&[("Mon", "09:00 - 05:59")])), now));
        assert!(!is_night_pharmacy(Some(&hours(&[("Mon", "09:00 - 06:00")])), now));
        assert!(is_night_pharmacy(Some(&hours(&[("Mon", "00:00 - 24:00")])), now));
    }

    #[test]
    fn night_only_needs_a_readable_close_time() {
        let h = hours(&[("Mon", "??? - 23:30")]);
        let now = monday_at(12, 0);
        assert_eq!(evaluate_status(Some(&h), now), OpenStatus::Unknown);
        assert!(is_night_pharmacy(Some(&h), now));

        let unreadable = hours(&[("Mon", "09:00 - late")]);
        assert!(!is_night_pharmacy(Some(&unreadable), now));
    }

    #[test]
    fn past_midnight_window_is_not_open_on_the_listed_day() {
        let h = hours(&[("Mon", "18:00 - 02:00")]);
        assert_eq!(evaluate_status(Some(&h), monday_at(20, 0)), OpenStatus::Closed);
        assert_eq!(evaluate_status(Some(&h), monday_at(1, 0)), OpenStatus::Closed);
    }

    #[test]
    fn full_day_window_is_always_open() {
        let h = hours(&[("Mon", "00:00 - 24:00")]);
        assert_eq!(evaluate_status(Some(&h), monday_at(0, 0)), OpenStatus::Open);
        assert_eq!(evaluate_status(Some(&h), monday_at(23, 59)), OpenStatus::Open);
    }

    #[test]
    fn clock_time_parsing() {
        assert_eq!(parse_clock_time("09:05"), Ok(ClockTime { hour: 9, minute: 5 }));
        assert_eq!(parse_clock_time(" 9:05 "), Ok(ClockTime { hour: 9, minute: 5 }));
        assert_eq!(parse_clock_time("24:00"), Ok(ClockTime { hour: 24, minute: 0 }));
        assert!(parse_clock_time("24:01").is_err());
        assert!(parse_clock_time("12:60").is_err());
        assert!(parse_clock_time("-1:00").is_err());
        assert!(parse_clock_time("1200").is_err());
    }

    #[test]
    fn window_parsing_reports_which_part_failed() {
        assert_eq!(
            parse_window("09:00~18:00"),
            Err(HoursError::MissingSeparator("09:00~18:00".to_string()))
        );
        assert_eq!(
            parse_window("09:00 - 6pm"),
            Err(HoursError::InvalidTime("6pm".to_string()))
        );
    }
}
