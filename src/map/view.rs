//! Map viewport state: center, zoom and the terminal cell mapping.

use super::projection::{project, unproject, PixelPoint};
use crate::domain::pharmacy::GeoPoint;

/// Seoul City Hall.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint { lat: 37.5665, lng: 126.978 };
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom used after a successful "locate me".
pub const LOCATE_ZOOM: u8 = 15;
/// Zoom used when a list entry is selected.
pub const SELECT_ZOOM: u8 = 17;
pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 19;

/// Pixels covered by one terminal cell. Cells are roughly twice as tall as
/// they are wide, so the vertical scale doubles to keep the map square.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Pixels moved by one pan keystroke.
pub const PAN_STEP_PX: f64 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    /// Re-centers the map, clamping the zoom to the supported range.
    pub fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Returns `true` if the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        let before = self.zoom;
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
        self.zoom != before
    }

    /// Returns `true` if the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        let before = self.zoom;
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
        self.zoom != before
    }

    /// Moves the center by whole pan steps; positive `dx` is east, positive
    /// `dy` is south.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let mut center = project(self.center, self.zoom);
        center.x += f64::from(dx) * PAN_STEP_PX;
        center.y += f64::from(dy) * PAN_STEP_PX;
        self.center = unproject(center, self.zoom);
    }

    /// Maps a geographic point to a cell of a `cols` x `rows` viewport.
    ///
    /// Returns `None` when the point falls outside the viewport.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn to_cell(&self, point: GeoPoint, cols: usize, rows: usize) -> Option<(usize, usize)> {
        let offset = self.pixel_offset(project(point, self.zoom));

        let col = (offset.x / CELL_WIDTH_PX + cols as f64 / 2.0).round();
        let row = (offset.y / CELL_HEIGHT_PX + rows as f64 / 2.0).round();

        let inside = col >= 0.0 && row >= 0.0 && col < cols as f64 && row < rows as f64;
        inside.then(|| (col as usize, row as usize))
    }

    fn pixel_offset(&self, pixel: PixelPoint) -> PixelPoint {
        let center = project(self.center, self.zoom);
        PixelPoint {
            x: pixel.x - center.x,
            y: pixel.y - center.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_seoul_city_hall() {
        let view = MapView::default();
        assert_eq!(view.center, DEFAULT_CENTER);
        assert_eq!(view.zoom, 13);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = MapView::default();
        view.set_view(DEFAULT_CENTER, MAX_ZOOM);
        assert!(!view.zoom_in());
        assert_eq!(view.zoom, MAX_ZOOM);

        view.set_view(DEFAULT_CENTER, 0);
        assert_eq!(view.zoom, MIN_ZOOM);
        assert!(!view.zoom_out());
        assert!(view.zoom_in());
        assert_eq!(view.zoom, MIN_ZOOM + 1);
    }

    #[test]
    fn center_lands_in_the_middle_cell() {
        let view = MapView::default();
        assert_eq!(view.to_cell(DEFAULT_CENTER, 40, 20), Some((20, 10)));
    }

    #[test]
    fn distant_points_fall_outside() {
        let view = MapView::default();
        let busan = GeoPoint { lat: 35.1796, lng: 129.0756 };
        assert_eq!(view.to_cell(busan, 40, 20), None);
    }

    #[test]
    fn panning_east_moves_points_west() {
        let mut view = MapView::default();
        view.pan(1, 0);
        let (col, row) = view.to_cell(DEFAULT_CENTER, 40, 20).unwrap();
        assert_eq!(col, 20 - 8);
        assert_eq!(row, 10);
    }
}
