//! Wall-clock abstraction for evaluating opening hours.
//!
//! The status evaluator and filter pipeline never sample time themselves; the
//! caller passes the evaluation instant in. [`Clock`] is the single place the
//! plugin reads the current time, so tests can substitute a [`FixedClock`].

use chrono::{FixedOffset, NaiveDateTime, Utc};

/// Source of the local time used for open/closed evaluation.
pub trait Clock {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system UTC time shifted to a fixed offset.
///
/// The Zellij WASM sandbox has no timezone database, so the offset comes from
/// plugin configuration (`utc_offset`, default `+09:00`).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parses a UTC offset such as `+09:00`, `-05:30`, `+9` or `0`.
///
/// Returns `None` for anything else, including offsets beyond ±23:59.
#[must_use]
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, body) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };

    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (body.parse::<i32>().ok()?, 0),
    };

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_common_offset_forms() {
        assert_eq!(parse_utc_offset("+09:00"), FixedOffset::east_opt(9 * 3600));
        assert_eq!(parse_utc_offset("9"), FixedOffset::east_opt(9 * 3600));
        assert_eq!(parse_utc_offset("-05:30"), FixedOffset::east_opt(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_utc_offset("0"), FixedOffset::east_opt(0));
    }

    #[test]
    fn rejects_garbage_offsets() {
        assert!(parse_utc_offset("").is_none());
        assert!(parse_utc_offset("KST").is_none());
        assert!(parse_utc_offset("+24:00").is_none());
        assert!(parse_utc_offset("+09:75").is_none());
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
