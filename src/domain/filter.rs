//! Filter pipeline over the loaded pharmacy list.
//!
//! [`apply_filters`] is a pure, stable filter: it keeps the original relative
//! order of the input, never mutates it, and carries no state between calls.
//! Callers re-run it over the full dataset on every input change.
//!
//! A record passes when every active predicate holds:
//!
//! 1. **Text**: the lowercased query is a substring of the English name, the
//!    English address or the Korean name. An empty query matches everything.
//! 2. **Region**: when a region token is set, the Korean address contains it.
//! 3. **Mode**: [`FilterMode::OpenOnly`] requires an `Open` status,
//!    [`FilterMode::NightOnly`] requires the night flag, [`FilterMode::All`]
//!    adds nothing.

use super::hours::OpenStatus;
use super::pharmacy::Pharmacy;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Mutually exclusive status filter.
///
/// Exactly one variant is active at a time, replacing three independent
/// toggle buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    All,
    OpenOnly,
    NightOnly,
}

impl FilterMode {
    pub const ALL: [Self; 3] = [Self::All, Self::OpenOnly, Self::NightOnly];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::OpenOnly => "Open now",
            Self::NightOnly => "Night",
        }
    }
}

/// Current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text query, matched case-insensitively.
    pub query: String,
    /// Region token matched against the Korean address, if any.
    pub region: Option<String>,
    pub mode: FilterMode,
}

impl FilterState {
    /// Whether no predicate narrows the list.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.query.is_empty() && self.region.is_none() && self.mode == FilterMode::All
    }
}

/// Filter state with the query pre-lowercased, built once per pipeline run.
struct Predicate<'a> {
    query: String,
    region: Option<&'a str>,
    mode: FilterMode,
    now: NaiveDateTime,
}

impl<'a> Predicate<'a> {
    fn new(state: &'a FilterState, now: NaiveDateTime) -> Self {
        Self {
            query: state.query.to_lowercase(),
            region: state.region.as_deref().filter(|r| !r.is_empty()),
            mode: state.mode,
            now,
        }
    }

    fn matches_text(&self, pharmacy: &Pharmacy) -> bool {
        if self.query.is_empty() {
            return true;
        }
        [&pharmacy.name_en, &pharmacy.address_en, &pharmacy.name_kr]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.query))
    }

    fn matches_region(&self, pharmacy: &Pharmacy) -> bool {
        self.region
            .map_or(true, |region| pharmacy.address_kr.contains(region))
    }

    fn matches_mode(&self, pharmacy: &Pharmacy) -> bool {
        match self.mode {
            FilterMode::All => true,
            FilterMode::OpenOnly => pharmacy.status_at(self.now) == OpenStatus::Open,
            FilterMode::NightOnly => pharmacy.is_night_at(self.now),
        }
    }

    fn matches(&self, pharmacy: &Pharmacy) -> bool {
        self.matches_text(pharmacy) && self.matches_region(pharmacy) && self.matches_mode(pharmacy)
    }
}

/// Tests a single record against the filter state at `now`.
#[must_use]
pub fn matches(pharmacy: &Pharmacy, state: &FilterState, now: NaiveDateTime) -> bool {
    Predicate::new(state, now).matches(pharmacy)
}

/// Returns the records passing every active predicate, in input order.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use yakguk::domain::filter::{apply_filters, FilterState};
/// use yakguk::domain::Pharmacy;
///
/// let all = vec![Pharmacy::default(), Pharmacy::default()];
/// let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(apply_filters(&all, &FilterState::default(), now).len(), 2);
/// ```
#[must_use]
pub fn apply_filters<'a>(
    records: &'a [Pharmacy],
    state: &FilterState,
    now: NaiveDateTime,
) -> Vec<&'a Pharmacy> {
    let _span = tracing::debug_span!("apply_filters",
        total = records.len(),
        query_len = state.query.len(),
        region = ?state.region,
        mode = ?state.mode
    )
    .entered();

    let predicate = Predicate::new(state, now);
    let filtered: Vec<&Pharmacy> = records.iter().filter(|p| predicate.matches(p)).collect();

    tracing::debug!(filtered_count = filtered.len(), "filters applied");
    filtered
}

/// Same as [`apply_filters`], returning positions into `records` instead of
/// references so the result can be stored next to the records it indexes.
#[must_use]
pub fn filter_indices(records: &[Pharmacy], state: &FilterState, now: NaiveDateTime) -> Vec<usize> {
    let _span = tracing::debug_span!("filter_indices",
        total = records.len(),
        query_len = state.query.len(),
        region = ?state.region,
        mode = ?state.mode
    )
    .entered();

    let predicate = Predicate::new(state, now);
    let indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, p)| predicate.matches(p))
        .map(|(index, _)| index)
        .collect();

    tracing::debug!(filtered_count = indices.len(), "filters applied");
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hours::OperatingHours;
    use crate::domain::pharmacy::Coordinates;
    use chrono::NaiveDate;

    /// 2024-03-04 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn pharmacy(name_en: &str, name_kr: &str, address_kr: &str, monday: Option<&str>) -> Pharmacy {
        let operating_hours = monday.map(|entry| {
            let mut hours = OperatingHours::new();
            hours.insert("Mon".to_string(), entry.to_string());
            hours
        });
        Pharmacy {
            name_en: name_en.to_string(),
            name_kr: name_kr.to_string(),
            address_en: format!("{name_en} street, Seoul"),
            address_kr: address_kr.to_string(),
            phone: None,
            coordinates: Coordinates::new("126.97", "37.56"),
            operating_hours,
        }
    }

    fn dataset() -> Vec<Pharmacy> {
        vec![
            pharmacy("Onnuri Pharmacy", "온누리약국", "서울특별시 강남구 역삼동", Some("09:00 - 18:00")),
            pharmacy("Night Owl Pharmacy", "부엉이약국", "서울특별시 마포구 서교동", Some("12:00 - 02:00")),
            pharmacy("Central Pharmacy", "중앙약국", "서울특별시 강남구 삼성동", Some("Closed")),
            pharmacy("Hana Pharmacy", "하나약국", "서울특별시 종로구", None),
        ]
    }

    fn names<'a>(records: &[&'a Pharmacy]) -> Vec<&'a str> {
        records.iter().map(|p| p.name_en.as_str()).collect()
    }

    #[test]
    fn noop_filter_is_identity() {
        let all = dataset();
        let state = FilterState::default();
        assert!(state.is_noop());

        let filtered = apply_filters(&all, &state, monday_at(12, 0));
        assert_eq!(filtered.len(), all.len());
        assert!(filtered.iter().zip(&all).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn text_matches_any_field_case_insensitively() {
        let all = dataset();
        let now = monday_at(12, 0);

        let by_name = FilterState { query: "NIGHT".to_string(), ..FilterState::default() };
        assert_eq!(names(&apply_filters(&all, &by_name, now)), vec!["Night Owl Pharmacy"]);

        let by_korean = FilterState { query: "중앙".to_string(), ..FilterState::default() };
        assert_eq!(names(&apply_filters(&all, &by_korean, now)), vec!["Central Pharmacy"]);

        let by_address = FilterState { query: "hana street".to_string(), ..FilterState::default() };
        assert_eq!(names(&apply_filters(&all, &by_address, now)), vec!["Hana Pharmacy"]);
    }

    #[test]
    fn korean_address_is_not_a_text_field() {
        let all = dataset();
        let state = FilterState { query: "역삼동".to_string(), ..FilterState::default() };
        assert!(apply_filters(&all, &state, monday_at(12, 0)).is_empty());
    }

    #[test]
    fn region_excludes_non_matching_addresses() {
        let all = dataset();
        let state = FilterState { region: Some("강남구".to_string()), ..FilterState::default() };
        assert_eq!(
            names(&apply_filters(&all, &state, monday_at(12, 0))),
            vec!["Onnuri Pharmacy", "Central Pharmacy"]
        );
    }

    #[test]
    fn region_wins_over_a_matching_query() {
        let all = dataset();
        let state = FilterState {
            query: "night".to_string(),
            region: Some("강남구".to_string()),
            mode: FilterMode::All,
        };
        assert!(apply_filters(&all, &state, monday_at(12, 0)).is_empty());
    }

    #[test]
    fn open_only_keeps_open_records() {
        let all = dataset();
        let state = FilterState { mode: FilterMode::OpenOnly, ..FilterState::default() };

        assert_eq!(
            names(&apply_filters(&all, &state, monday_at(12, 0))),
            vec!["Onnuri Pharmacy"]
        );
        assert!(apply_filters(&all, &state, monday_at(19, 0)).is_empty());
    }

    #[test]
    fn open_only_and_text_intersect() {
        let all = dataset();
        let now = monday_at(12, 30);
        let state = FilterState {
            query: "pharmacy".to_string(),
            mode: FilterMode::OpenOnly,
            ..FilterState::default()
        };
        let open_only = FilterState { mode: FilterMode::OpenOnly, ..FilterState::default() };

        let narrowed = apply_filters(&all, &state, now);
        assert_eq!(names(&narrowed), names(&apply_filters(&all, &open_only, now)));

        let no_match = FilterState { query: "central".to_string(), ..state };
        assert!(apply_filters(&all, &no_match, now).is_empty());
    }

    #[test]
    fn night_only_keeps_late_closers() {
        let all = dataset();
        let state = FilterState { mode: FilterMode::NightOnly, ..FilterState::default() };
        assert_eq!(
            names(&apply_filters(&all, &state, monday_at(12, 0))),
            vec!["Night Owl Pharmacy"]
        );
    }

    #[test]
    fn unmappable_records_stay_in_the_list() {
        let mut all = dataset();
        all[0].coordinates = Coordinates::new("NaN", "37.5");

        let filtered = apply_filters(&all, &FilterState::default(), monday_at(12, 0));
        assert_eq!(filtered.len(), all.len());
        assert!(!filtered[0].is_mappable());
    }

    #[test]
    fn indices_agree_with_references() {
        let all = dataset();
        let state = FilterState { region: Some("강남구".to_string()), ..FilterState::default() };
        let now = monday_at(12, 0);

        let by_index: Vec<&Pharmacy> =
            filter_indices(&all, &state, now).into_iter().map(|i| &all[i]).collect();
        assert_eq!(by_index, apply_filters(&all, &state, now));
        assert_eq!(filter_indices(&all, &state, now), vec![0, 2]);
    }

    #[test]
    fn single_record_match() {
        let all = dataset();
        let state = FilterState { mode: FilterMode::NightOnly, ..FilterState::default() };
        assert!(matches(&all[1], &state, monday_at(12, 0)));
        assert!(!matches(&all[0], &state, monday_at(12, 0)));
    }

    #[test]
    fn empty_region_token_is_ignored() {
        let all = dataset();
        let state = FilterState { region: Some(String::new()), ..FilterState::default() };
        assert_eq!(apply_filters(&all, &state, monday_at(12, 0)).len(), all.len());
    }
}
