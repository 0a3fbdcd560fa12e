//! Spherical Web Mercator projection with 256 px tiles.
//!
//! World pixel coordinates at zoom `z` span `256 * 2^z` pixels on each axis,
//! with the origin at the north-west corner (lng -180, lat ~85.05).

use crate::domain::pharmacy::GeoPoint;
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A position in world pixel space at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// World size in pixels along one axis at `zoom`.
#[must_use]
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(30))
}

/// Projects a geographic point into world pixels at `zoom`.
#[must_use]
pub fn project(point: GeoPoint, zoom: u8) -> PixelPoint {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;

    PixelPoint { x, y }
}

/// Inverse of [`project`].
#[must_use]
pub fn unproject(pixel: PixelPoint, zoom: u8) -> GeoPoint {
    let size = world_size(zoom);

    let lng = pixel.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * pixel.y / size);
    let lat = n.sinh().atan().to_degrees();

    GeoPoint {
        lat: lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        lng: lng.clamp(-180.0, 180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn origin_maps_to_world_center() {
        let p = project(GeoPoint { lat: 0.0, lng: 0.0 }, 0);
        assert!(close(p.x, 128.0));
        assert!(close(p.y, 128.0));
    }

    #[test]
    fn each_zoom_level_doubles_the_world() {
        assert!(close(world_size(0), 256.0));
        assert!(close(world_size(13), 256.0 * 8192.0));

        let seoul = GeoPoint { lat: 37.5665, lng: 126.978 };
        let z13 = project(seoul, 13);
        let z14 = project(seoul, 14);
        assert!(close(z14.x, z13.x * 2.0));
        assert!(close(z14.y, z13.y * 2.0));
    }

    #[test]
    fn unproject_inverts_project() {
        let seoul = GeoPoint { lat: 37.5665, lng: 126.978 };
        let back = unproject(project(seoul, 15), 15);
        assert!(close(back.lat, seoul.lat));
        assert!(close(back.lng, seoul.lng));
    }

    #[test]
    fn north_is_up() {
        let north = project(GeoPoint { lat: 37.6, lng: 127.0 }, 13);
        let south = project(GeoPoint { lat: 37.5, lng: 127.0 }, 13);
        assert!(north.y < south.y);
    }
}
