//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for the plugin: the immutable
//! dataset, the current filter selection, the derived filtered list, map
//! viewport, outstanding requests and the evaluation instant.
//!
//! # Architecture
//!
//! Core data (`pharmacies`, `filter`) is kept apart from derived state
//! (`filtered`, `selected_index`). Every change to the filter re-runs the
//! filter pipeline over the full dataset via [`AppState::refilter`]; nothing
//! is patched incrementally. View models are computed on demand from a state
//! snapshot.
//!
//! # Example
//!
//! ```rust
//! use yakguk::app::{AppSettings, AppState};
//! use yakguk::ui::Theme;
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let mut state = AppState::new(AppSettings::default(), Theme::default(), now);
//! state.refilter();
//! let viewmodel = state.compute_viewmodel(24, 80);
//! ```

use super::actions::{Action, RequestKind};
use super::modes::{InputMode, LoadState, Panel, SearchFocus};
use crate::domain::error::YakgukError;
use crate::domain::filter::{filter_indices, FilterMode, FilterState};
use crate::domain::pharmacy::{GeoPoint, Pharmacy};
use crate::map::{MapView, MarkerLayer, Popup, LOCATE_ZOOM, SELECT_ZOOM};
use crate::ui::helpers::match_ranges;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BodyView, CardItem, EmptyState, FilterBarInfo, FooterInfo, HeaderInfo, ListView, MapGlyph,
    MapPanelView, ModeTab, OverlayInfo, SearchBarInfo, UIViewModel,
};
use crate::worker::WorkerMessage;
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::path::PathBuf;

/// Message shown in place of the loading indicator when the dataset fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try refreshing.";

/// Message shown when the filters exclude every record.
pub const NO_RESULTS_MESSAGE: &str = "No pharmacies found with current filters.";

pub const LOADING_MESSAGE: &str = "Loading pharmacies...";

/// The 25 autonomous districts of Seoul, as they appear in Korean addresses.
pub const SEOUL_DISTRICTS: [&str; 25] = [
    "강남구", "강동구", "강북구", "강서구", "관악구", "광진구", "구로구", "금천구", "노원구",
    "도봉구", "동대문구", "동작구", "마포구", "서대문구", "서초구", "성동구", "성북구", "송파구",
    "양천구", "영등포구", "용산구", "은평구", "종로구", "중구", "중랑구",
];

/// Rows taken by the blank top line, header, filter bar, border, bottom
/// border and footer.
const CHROME_ROWS: usize = 7;
const SEARCH_BAR_ROWS: usize = 3;
const CARD_ROWS: usize = 2;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// JSON file read by the worker thread.
    File(PathBuf),
    /// JSON document fetched with a web request.
    Url(String),
}

/// Where "locate me" gets the user position from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Locating is unavailable; requests are logged and ignored.
    Disabled,
    /// IP geolocation endpoint.
    Url(String),
    /// Fixed position from configuration.
    Fixed(GeoPoint),
}

/// Runtime settings the state machine needs, derived from plugin config.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub data_source: DataSource,
    pub location_source: LocationSource,
    /// Region tokens cycled by the region selector.
    pub regions: Vec<String>,
    /// Maximum number of cards rendered.
    pub list_limit: usize,
    pub request_timeout_secs: u64,
    pub refresh_interval_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_source: DataSource::File(PathBuf::from("/host/pharmacy_data.json")),
            location_source: LocationSource::Disabled,
            regions: SEOUL_DISTRICTS.iter().map(ToString::to_string).collect(),
            list_limit: 50,
            request_timeout_secs: 10,
            refresh_interval_secs: 60,
        }
    }
}

/// What a one-shot timer was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPurpose {
    RequestTimeout,
    StatusRefresh,
}

/// A timer handed to the runtime and not yet fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTimer {
    due: NaiveDateTime,
    purpose: TimerPurpose,
}

/// `now` plus `secs`, saturating at the latest representable instant.
fn deadline_after(now: NaiveDateTime, secs: u64) -> NaiveDateTime {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Opening hours resolve to the minute, so instants in the same minute
/// filter identically.
fn same_minute(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour() && a.minute() == b.minute()
}

/// An outstanding request and the instant after which it is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: u64,
    pub deadline: NaiveDateTime,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Full dataset, immutable once loaded.
    pub pharmacies: Vec<Pharmacy>,

    /// Positions into `pharmacies` passing the current filters, in dataset
    /// order. Recomputed by [`AppState::refilter`].
    pub filtered: Vec<usize>,

    /// Zero-based index into the rendered part of `filtered`.
    pub selected_index: usize,

    pub input_mode: InputMode,
    pub filter: FilterState,

    /// Position in `settings.regions`; `None` means all regions.
    pub region_cursor: Option<usize>,

    pub panel: Panel,
    pub load_state: LoadState,
    pub map_view: MapView,

    /// Last known user position, drawn as a distinct marker.
    pub user_location: Option<GeoPoint>,

    /// Whether the detail popup for the selected record is shown.
    pub popup_open: bool,

    /// Instant used to evaluate opening hours; updated on every event.
    pub now: NaiveDateTime,

    /// Instant of the last filter pass.
    filtered_at: NaiveDateTime,

    pub theme: Theme,
    pub settings: AppSettings,

    pub pending_dataset: Option<PendingRequest>,
    pub pending_location: Option<PendingRequest>,
    next_request_id: u64,

    /// Timers armed with the runtime, in arming order.
    ///
    /// Zellij reports a fired timer without saying which one, so each tick
    /// is matched to the earliest due entry.
    scheduled_timers: Vec<ScheduledTimer>,

    /// Set once the startup requests have been issued.
    pub started: bool,
}

impl AppState {
    #[must_use]
    pub fn new(settings: AppSettings, theme: Theme, now: NaiveDateTime) -> Self {
        Self {
            pharmacies: Vec::new(),
            filtered: Vec::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            filter: FilterState::default(),
            region_cursor: None,
            panel: Panel::List,
            load_state: LoadState::Loading,
            map_view: MapView::default(),
            user_location: None,
            popup_open: false,
            now,
            filtered_at: now,
            theme,
            settings,
            pending_dataset: None,
            pending_location: None,
            next_request_id: 1,
            scheduled_timers: Vec::new(),
            started: false,
        }
    }

    /// Re-runs the filter pipeline over the full dataset.
    ///
    /// Clamps the selection to the rendered part of the result.
    pub fn refilter(&mut self) {
        self.filtered = filter_indices(&self.pharmacies, &self.filter, self.now);
        self.filtered_at = self.now;

        let visible = self.visible_count();
        if visible == 0 {
            self.selected_index = 0;
            self.popup_open = false;
        } else {
            self.selected_index = self.selected_index.min(visible - 1);
        }
    }

    /// Moves the evaluation instant to `now`.
    ///
    /// When a status filter is active and the minute changed since the last
    /// filter pass, the pipeline re-runs so cards never show a status the
    /// active filter would exclude.
    pub fn advance_clock(&mut self, now: NaiveDateTime) {
        self.now = now;
        if self.filter.mode != FilterMode::All && !same_minute(self.filtered_at, now) {
            tracing::trace!("minute changed under a status filter, refiltering");
            self.refilter();
        }
    }

    /// Number of cards rendered: the filtered count capped at `list_limit`.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.filtered.len().min(self.settings.list_limit)
    }

    /// Filtered records in dataset order.
    #[must_use]
    pub fn filtered_records(&self) -> Vec<&Pharmacy> {
        self.filtered
            .iter()
            .filter_map(|&index| self.pharmacies.get(index))
            .collect()
    }

    #[must_use]
    pub fn selected_pharmacy(&self) -> Option<&Pharmacy> {
        if self.selected_index >= self.visible_count() {
            return None;
        }
        self.filtered
            .get(self.selected_index)
            .and_then(|&index| self.pharmacies.get(index))
    }

    /// Moves the selection down, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let visible = self.visible_count();
        if visible == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % visible;
        self.follow_selection();
    }

    /// Moves the selection up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let visible = self.visible_count();
        if visible == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            visible - 1
        } else {
            self.selected_index - 1
        };
        self.follow_selection();
    }

    /// Keeps the map on the selected record while its popup is open.
    fn follow_selection(&mut self) {
        if !(self.popup_open && self.panel == Panel::Map) {
            return;
        }
        match self.selected_pharmacy().and_then(Pharmacy::position) {
            Some(position) => self.map_view.set_view(position, self.map_view.zoom),
            None => self.popup_open = false,
        }
    }

    /// Centers the map on the selected record at the close zoom level and
    /// opens its popup.
    ///
    /// Returns `false` if nothing is selected or the record has no valid
    /// coordinates.
    pub fn focus_selected(&mut self) -> bool {
        let Some(position) = self.selected_pharmacy().and_then(Pharmacy::position) else {
            return false;
        };
        self.map_view.set_view(position, SELECT_ZOOM);
        self.panel = Panel::Map;
        self.popup_open = true;
        true
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        self.filter.mode = mode;
        self.refilter();
    }

    /// Steps the region selector; the cycle is all regions, then each
    /// configured region in order.
    pub fn cycle_region(&mut self, forward: bool) {
        let count = self.settings.regions.len();
        if count == 0 {
            return;
        }

        self.region_cursor = match (self.region_cursor, forward) {
            (None, true) => Some(0),
            (None, false) => Some(count - 1),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        self.filter.region = self
            .region_cursor
            .and_then(|i| self.settings.regions.get(i))
            .cloned();
        self.refilter();
    }

    fn next_request(&mut self) -> PendingRequest {
        let id = self.next_request_id;
        self.next_request_id += 1;
        PendingRequest {
            id,
            deadline: deadline_after(self.now, self.settings.request_timeout_secs),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn schedule(&mut self, purpose: TimerPurpose, secs: u64) -> Action {
        self.scheduled_timers.push(ScheduledTimer {
            due: deadline_after(self.now, secs),
            purpose,
        });
        Action::ScheduleTimer { secs: secs as f64 }
    }

    fn timeout_timer(&mut self) -> Action {
        self.schedule(TimerPurpose::RequestTimeout, self.settings.request_timeout_secs)
    }

    /// Issues the dataset request. At most one is ever in flight.
    pub fn begin_dataset_load(&mut self) -> Vec<Action> {
        if self.pending_dataset.is_some() {
            tracing::debug!("dataset request already in flight");
            return vec![];
        }

        let request = self.next_request();
        self.pending_dataset = Some(request);
        self.load_state = LoadState::Loading;

        let load = match &self.settings.data_source {
            DataSource::File(path) => {
                tracing::debug!(path = ?path, request_id = request.id, "loading dataset file");
                Action::PostToWorker(WorkerMessage::load_dataset(
                    path.to_string_lossy().to_string(),
                    request.id,
                ))
            }
            DataSource::Url(url) => {
                tracing::debug!(url = %url, request_id = request.id, "fetching dataset");
                Action::FetchUrl {
                    kind: RequestKind::Dataset,
                    request_id: request.id,
                    url: url.clone(),
                }
            }
        };

        vec![load, self.timeout_timer()]
    }

    /// Starts a position lookup. A fixed position applies immediately.
    ///
    /// Returns the actions to run and whether the view changed.
    pub fn begin_locate(&mut self) -> (bool, Vec<Action>) {
        match self.settings.location_source.clone() {
            LocationSource::Disabled => {
                tracing::warn!("locate requested but no location source is configured");
                (false, vec![])
            }
            LocationSource::Fixed(point) => {
                self.apply_location(point);
                (true, vec![])
            }
            LocationSource::Url(url) => {
                if self.pending_location.is_some() {
                    tracing::debug!("location request already in flight");
                    return (false, vec![]);
                }
                let request = self.next_request();
                self.pending_location = Some(request);
                tracing::debug!(url = %url, request_id = request.id, "requesting position");
                (
                    false,
                    vec![
                        Action::FetchUrl {
                            kind: RequestKind::Location,
                            request_id: request.id,
                            url,
                        },
                        self.timeout_timer(),
                    ],
                )
            }
        }
    }

    /// Records the user position and re-centers the map on it.
    pub fn apply_location(&mut self, point: GeoPoint) {
        tracing::debug!(lat = point.lat, lng = point.lng, "user position resolved");
        self.user_location = Some(point);
        self.map_view.set_view(point, LOCATE_ZOOM);
    }

    /// Installs a freshly loaded dataset and shows the unfiltered view.
    pub fn dataset_loaded(&mut self, pharmacies: Vec<Pharmacy>) {
        tracing::info!(count = pharmacies.len(), "dataset loaded");
        self.pharmacies = pharmacies;
        self.load_state = LoadState::Ready;
        self.selected_index = 0;
        self.refilter();
    }

    /// Marks the dataset load as failed; the overlay shows the fixed message.
    pub fn dataset_failed(&mut self, reason: String) {
        tracing::error!(reason = %reason, "dataset load failed");
        self.load_state = LoadState::Failed(reason);
    }

    /// Fails every outstanding request whose deadline has passed.
    ///
    /// Returns `true` if the visible state changed.
    pub fn expire_requests(&mut self) -> bool {
        let now = self.now;
        let mut changed = false;

        if self.pending_dataset.is_some_and(|p| p.deadline <= now) {
            self.pending_dataset = None;
            let error = YakgukError::Timeout {
                what: "dataset request",
                secs: self.settings.request_timeout_secs,
            };
            self.dataset_failed(error.to_string());
            changed = true;
        }

        if self.pending_location.is_some_and(|p| p.deadline <= now) {
            self.pending_location = None;
            let error = YakgukError::Timeout {
                what: "position request",
                secs: self.settings.request_timeout_secs,
            };
            tracing::warn!(error = %error, "locate failed");
        }

        changed
    }

    /// Takes the pending request of `kind` if `request_id` matches it.
    ///
    /// Late answers to timed-out or superseded requests yield `None`.
    pub fn settle_request(&mut self, kind: RequestKind, request_id: u64) -> bool {
        let slot = match kind {
            RequestKind::Dataset => &mut self.pending_dataset,
            RequestKind::Location => &mut self.pending_location,
        };
        if slot.is_some_and(|p| p.id == request_id) {
            *slot = None;
            true
        } else {
            tracing::debug!(kind = kind.as_str(), request_id, "ignoring stale response");
            false
        }
    }

    /// Accounts for one fired timer.
    ///
    /// The earliest due timer is taken as the one that fired. If it was the
    /// status refresh, statuses are re-evaluated and the next refresh is
    /// armed; the tick's wall-clock time is not compared with the due time,
    /// so an early tick still keeps the chain going.
    pub fn timer_fired(&mut self) -> Option<Action> {
        let earliest = self
            .scheduled_timers
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| timer.due)
            .map(|(index, _)| index)?;

        let fired = self.scheduled_timers.remove(earliest);
        if fired.purpose != TimerPurpose::StatusRefresh {
            return None;
        }
        self.refilter();
        Some(self.arm_refresh())
    }

    /// Schedules the next periodic status refresh.
    pub fn arm_refresh(&mut self) -> Action {
        let secs = self.settings.refresh_interval_secs.max(1);
        self.schedule(TimerPurpose::StatusRefresh, secs)
    }

    /// When the armed status refresh is due, if one is armed.
    #[must_use]
    pub fn next_refresh(&self) -> Option<NaiveDateTime> {
        self.scheduled_timers
            .iter()
            .filter(|timer| timer.purpose == TimerPurpose::StatusRefresh)
            .map(|timer| timer.due)
            .min()
    }

    /// Label of the active region selection.
    #[must_use]
    pub fn region_label(&self) -> &str {
        self.filter.region.as_deref().unwrap_or("All regions")
    }

    /// Computes a renderable view model for a `rows` x `cols` pane.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let search_bar = self.compute_search_bar();
        let chrome = CHROME_ROWS + if search_bar.is_some() { SEARCH_BAR_ROWS } else { 0 };
        let body_rows = rows.saturating_sub(chrome);

        UIViewModel {
            header: self.compute_header(),
            filter_bar: self.compute_filter_bar(),
            search_bar,
            body: self.compute_body(body_rows, cols),
            footer: self.compute_footer(),
        }
    }

    fn compute_body(&self, body_rows: usize, cols: usize) -> BodyView {
        match &self.load_state {
            LoadState::Loading => {
                return BodyView::Overlay(OverlayInfo {
                    message: LOADING_MESSAGE.to_string(),
                    is_error: false,
                })
            }
            LoadState::Failed(_) => {
                return BodyView::Overlay(OverlayInfo {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                    is_error: true,
                })
            }
            LoadState::Ready => {}
        }

        if self.filtered.is_empty() {
            return BodyView::Empty(EmptyState {
                message: NO_RESULTS_MESSAGE.to_string(),
                subtitle: "Try a different search, region or status filter".to_string(),
            });
        }

        match self.panel {
            Panel::List => BodyView::List(self.compute_list(body_rows)),
            Panel::Map => BodyView::Map(self.compute_map(body_rows, cols)),
        }
    }

    fn compute_list(&self, body_rows: usize) -> ListView {
        let total = self.filtered.len();
        let visible = self.visible_count();
        let notice = (total > self.settings.list_limit)
            .then(|| format!("Showing {} of {total} results.", self.settings.list_limit));

        let card_rows = body_rows.saturating_sub(usize::from(notice.is_some()));
        let capacity = (card_rows / CARD_ROWS).max(1);

        let mut start = self.selected_index.saturating_sub(capacity / 2);
        let end = (start + capacity).min(visible);
        if end - start < capacity && visible >= capacity {
            start = end.saturating_sub(capacity);
        }

        let highlight = !self.filter.query.is_empty();
        let cards = self.filtered[start..end]
            .iter()
            .enumerate()
            .filter_map(|(offset, &index)| {
                let pharmacy = self.pharmacies.get(index)?;
                Some(self.compute_card(pharmacy, start + offset, highlight))
            })
            .collect();

        ListView {
            cards,
            selected_index: self.selected_index.saturating_sub(start),
            notice,
        }
    }

    fn compute_card(&self, pharmacy: &Pharmacy, absolute_idx: usize, highlight: bool) -> CardItem {
        let name = pharmacy.display_name().to_string();
        let highlight_ranges = if highlight {
            match_ranges(&name, &self.filter.query)
        } else {
            vec![]
        };

        CardItem {
            name,
            name_kr: pharmacy.name_kr.trim().to_string(),
            address: pharmacy.display_address().to_string(),
            status: pharmacy.status_at(self.now),
            night: pharmacy.is_night_at(self.now),
            is_selected: absolute_idx == self.selected_index,
            mappable: pharmacy.is_mappable(),
            highlight_ranges,
        }
    }

    fn compute_map(&self, body_rows: usize, cols: usize) -> MapPanelView {
        let height = body_rows.saturating_sub(1);
        let records = self.filtered_records();
        let layer = MarkerLayer::build(&records, self.map_view.zoom);
        let selected = (self.selected_index < self.visible_count()).then_some(self.selected_index);

        let mut glyphs: Vec<MapGlyph> = layer
            .clusters
            .iter()
            .filter_map(|cluster| {
                let (col, row) = self.map_view.to_cell(cluster.center, cols, height)?;
                let is_selected = selected.is_some_and(|i| cluster.contains(i));
                Some(if cluster.is_single() {
                    MapGlyph::Pin { col, row, is_selected }
                } else {
                    MapGlyph::Cluster {
                        col,
                        row,
                        count: cluster.len(),
                        is_selected,
                    }
                })
            })
            .collect();

        if let Some((col, row)) = self
            .user_location
            .and_then(|point| self.map_view.to_cell(point, cols, height))
        {
            glyphs.push(MapGlyph::UserLocation { col, row });
        }

        // selected marker drawn last so it stays visible on overlap
        glyphs.sort_by_key(MapGlyph::is_selected);

        let popup = if self.popup_open {
            self.selected_pharmacy()
                .filter(|p| p.is_mappable())
                .map(|p| Popup::for_pharmacy(p, self.now))
        } else {
            None
        };

        let mut status = format!(
            "Zoom {} · {} on map",
            self.map_view.zoom,
            layer.markers.len()
        );
        if layer.skipped > 0 {
            status.push_str(&format!(" · {} without coordinates", layer.skipped));
        }

        MapPanelView {
            width: cols,
            height,
            glyphs,
            popup,
            status,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let counts = match self.load_state {
            LoadState::Ready => format!(
                "{} of {} · {}",
                self.filtered.len(),
                self.pharmacies.len(),
                self.filter.mode.label()
            ),
            LoadState::Loading => "loading".to_string(),
            LoadState::Failed(_) => "unavailable".to_string(),
        };
        HeaderInfo {
            title: " 약국 Pharmacy Finder ".to_string(),
            counts,
        }
    }

    fn compute_filter_bar(&self) -> FilterBarInfo {
        FilterBarInfo {
            modes: FilterMode::ALL
                .iter()
                .map(|&mode| ModeTab {
                    label: mode.label().to_string(),
                    key: match mode {
                        FilterMode::All => 'a',
                        FilterMode::OpenOnly => 'o',
                        FilterMode::NightOnly => 'n',
                    },
                    active: mode == self.filter.mode,
                })
                .collect(),
            region: self.region_label().to_string(),
            panel: self.panel,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.panel) {
            (InputMode::Search(SearchFocus::Typing), _) => {
                "ESC: exit search  Enter: results  Ctrl+n/p: navigate  Type to filter"
            }
            (InputMode::Search(SearchFocus::Navigating), _) => {
                "ESC: exit search  /: edit query  j/k: navigate  Enter: show on map"
            }
            (InputMode::Normal, Panel::List) => {
                "j/k: navigate  /: search  a/o/n: status  r/R: region  Enter: map  l: locate  Tab: map  q: quit"
            }
            (InputMode::Normal, Panel::Map) => {
                "j/k: select  arrows: pan  +/-: zoom  Enter: popup  Esc: close popup  l: locate  Tab: list  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.filter.query.clone(),
                focused: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hours::{OpenStatus, OperatingHours};
    use crate::domain::pharmacy::Coordinates;
    use chrono::NaiveDate;

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn pharmacy(name: &str, district: &str, x: &str, y: &str, monday: &str) -> Pharmacy {
        let mut hours = OperatingHours::new();
        hours.insert("Mon".to_string(), monday.to_string());
        Pharmacy {
            name_en: name.to_string(),
            address_kr: format!("서울특별시 {district}"),
            coordinates: Coordinates::new(x, y),
            operating_hours: Some(hours),
            ..Pharmacy::default()
        }
    }

    fn ready_state(records: Vec<Pharmacy>) -> AppState {
        let mut state = AppState::new(AppSettings::default(), Theme::default(), monday_at(12, 0));
        state.dataset_loaded(records);
        state
    }

    fn many(count: usize) -> Vec<Pharmacy> {
        (0..count)
            .map(|i| pharmacy(&format!("Pharmacy {i}"), "중구", "126.97", "37.56", "09:00 - 18:00"))
            .collect()
    }

    #[test]
    fn initial_view_is_unfiltered() {
        let state = ready_state(many(3));
        assert_eq!(state.filtered, vec![0, 1, 2]);
        assert!(state.load_state.is_ready());
    }

    #[test]
    fn list_is_capped_with_notice() {
        let state = ready_state(many(120));
        assert_eq!(state.visible_count(), 50);

        let BodyView::List(list) = state.compute_viewmodel(40, 100).body else {
            panic!("expected list body");
        };
        assert_eq!(list.notice.as_deref(), Some("Showing 50 of 120 results."));
        assert!(list.cards.len() <= 50);
    }

    #[test]
    fn selection_wraps_within_the_cap() {
        let mut state = ready_state(many(60));
        state.move_selection_up();
        assert_eq!(state.selected_index, 49);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn empty_result_shows_fixed_message() {
        let mut state = ready_state(many(2));
        state.filter.query = "nothing matches this".to_string();
        state.refilter();

        let BodyView::Empty(empty) = state.compute_viewmodel(24, 80).body else {
            panic!("expected empty body");
        };
        assert_eq!(empty.message, NO_RESULTS_MESSAGE);
    }

    #[test]
    fn failed_load_shows_fixed_message() {
        let mut state = AppState::new(AppSettings::default(), Theme::default(), monday_at(12, 0));
        state.dataset_failed("boom".to_string());

        let BodyView::Overlay(overlay) = state.compute_viewmodel(24, 80).body else {
            panic!("expected overlay body");
        };
        assert_eq!(overlay.message, LOAD_FAILED_MESSAGE);
        assert!(overlay.is_error);
    }

    #[test]
    fn region_cycle_wraps_through_all_regions() {
        let mut state = ready_state(vec![
            pharmacy("A", "강남구", "127.0", "37.5", "Closed"),
            pharmacy("B", "중랑구", "127.0", "37.5", "Closed"),
        ]);

        state.cycle_region(true);
        assert_eq!(state.filter.region.as_deref(), Some("강남구"));
        assert_eq!(state.filtered, vec![0]);

        state.cycle_region(false);
        assert_eq!(state.filter.region, None);
        assert_eq!(state.filtered.len(), 2);

        state.cycle_region(false);
        assert_eq!(state.filter.region.as_deref(), Some("중랑구"));
        assert_eq!(state.filtered, vec![1]);
    }

    #[test]
    fn focus_selected_zooms_in_on_the_record() {
        let mut state = ready_state(vec![pharmacy("A", "중구", "126.99", "37.56", "Closed")]);
        assert!(state.focus_selected());
        assert_eq!(state.map_view.zoom, SELECT_ZOOM);
        assert_eq!(state.panel, Panel::Map);
        assert!(state.popup_open);

        let BodyView::Map(map) = state.compute_viewmodel(30, 80).body else {
            panic!("expected map body");
        };
        let popup = map.popup.unwrap();
        assert_eq!(popup.status, OpenStatus::Closed);
        assert_eq!(popup.phone, "N/A");
    }

    #[test]
    fn unmappable_record_cannot_be_focused() {
        let mut state = ready_state(vec![pharmacy("A", "중구", "NaN", "37.5", "Closed")]);
        assert!(!state.focus_selected());
        assert_eq!(state.panel, Panel::List);
    }

    #[test]
    fn map_counts_records_without_coordinates() {
        let mut state = ready_state(vec![
            pharmacy("A", "중구", "NaN", "37.5", "Closed"),
            pharmacy("B", "중구", "126.978", "37.5665", "Closed"),
        ]);
        state.panel = Panel::Map;

        let BodyView::Map(map) = state.compute_viewmodel(30, 80).body else {
            panic!("expected map body");
        };
        assert!(map.status.contains("1 on map"));
        assert!(map.status.contains("1 without coordinates"));
        assert_eq!(map.glyphs.len(), 1);
    }

    #[test]
    fn request_ids_must_match_to_settle() {
        let mut state = AppState::new(AppSettings::default(), Theme::default(), monday_at(12, 0));
        let actions = state.begin_dataset_load();
        assert_eq!(actions.len(), 2);
        let id = state.pending_dataset.unwrap().id;

        assert!(!state.settle_request(RequestKind::Dataset, id + 100));
        assert!(state.settle_request(RequestKind::Dataset, id));
        assert!(!state.settle_request(RequestKind::Dataset, id));
    }

    #[test]
    fn expired_dataset_request_fails_the_load() {
        let mut state = AppState::new(AppSettings::default(), Theme::default(), monday_at(12, 0));
        let _ = state.begin_dataset_load();

        state.now = monday_at(12, 0) + TimeDelta::seconds(5);
        assert!(!state.expire_requests());

        state.now = monday_at(12, 0) + TimeDelta::seconds(10);
        assert!(state.expire_requests());
        assert!(matches!(state.load_state, LoadState::Failed(_)));
        assert!(state.pending_dataset.is_none());
    }

    #[test]
    fn fixed_location_recenters_immediately() {
        let settings = AppSettings {
            location_source: LocationSource::Fixed(GeoPoint { lat: 37.5, lng: 127.0 }),
            ..AppSettings::default()
        };
        let mut state = AppState::new(settings, Theme::default(), monday_at(12, 0));

        let (changed, actions) = state.begin_locate();
        assert!(changed);
        assert!(actions.is_empty());
        assert_eq!(state.map_view.zoom, LOCATE_ZOOM);
        assert_eq!(state.user_location, Some(GeoPoint { lat: 37.5, lng: 127.0 }));
    }

    #[test]
    fn search_highlights_card_names() {
        let mut state = ready_state(vec![pharmacy("Seoul Pharmacy", "중구", "127.0", "37.5", "Closed")]);
        state.filter.query = "pharm".to_string();
        state.refilter();

        let BodyView::List(list) = state.compute_viewmodel(24, 80).body else {
            panic!("expected list body");
        };
        assert_eq!(list.cards[0].highlight_ranges, vec![(6, 11)]);
    }

    #[test]
    fn header_reports_counts_and_mode() {
        let mut state = ready_state(many(4));
        state.set_mode(FilterMode::OpenOnly);
        assert_eq!(state.compute_viewmodel(24, 80).header.counts, "4 of 4 · Open now");
    }
}
