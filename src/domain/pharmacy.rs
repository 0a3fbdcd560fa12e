//! Pharmacy domain model.
//!
//! A [`Pharmacy`] is one record of the loaded dataset. It is immutable once
//! loaded; open/night status is derived on demand from `operating_hours` and
//! never stored on the record.

use super::hours::{evaluate_status, is_night_pharmacy, OpenStatus, OperatingHours};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Placeholder shown for absent optional fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite or out-of-range values.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// Raw coordinate strings as supplied by the dataset.
///
/// `x` is the longitude and `y` the latitude. They stay unparsed so that the
/// original text survives for display and so a bad value only affects the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: String,
    pub y: String,
}

impl Coordinates {
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self { x: x.into(), y: y.into() }
    }

    /// Parses the pair into a [`GeoPoint`].
    ///
    /// Returns `None` when either side is empty, non-numeric, `NaN`, infinite
    /// or outside the valid latitude/longitude range.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        let lng = self.x.trim().parse::<f64>().ok()?;
        let lat = self.y.trim().parse::<f64>().ok()?;
        GeoPoint::new(lat, lng)
    }
}

/// One pharmacy from the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub name_en: String,
    pub name_kr: String,
    pub address_en: String,
    pub address_kr: String,
    pub phone: Option<String>,
    pub coordinates: Coordinates,
    /// `None` when the dataset carries no hours at all for this record.
    pub operating_hours: Option<OperatingHours>,
}

impl Pharmacy {
    /// Parsed map position, if the coordinates are valid.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        self.coordinates.position()
    }

    /// Whether the record can be drawn on the map.
    #[must_use]
    pub fn is_mappable(&self) -> bool {
        self.position().is_some()
    }

    #[must_use]
    pub fn status_at(&self, now: NaiveDateTime) -> OpenStatus {
        evaluate_status(self.operating_hours.as_ref(), now)
    }

    #[must_use]
    pub fn is_night_at(&self, now: NaiveDateTime) -> bool {
        is_night_pharmacy(self.operating_hours.as_ref(), now)
    }

    /// English name, falling back to the Korean name, then `N/A`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_blank(&self.name_en)
            .or_else(|| non_blank(&self.name_kr))
            .unwrap_or(NOT_AVAILABLE)
    }

    /// English address, falling back to the Korean address, then `N/A`.
    #[must_use]
    pub fn display_address(&self) -> &str {
        non_blank(&self.address_en)
            .or_else(|| non_blank(&self.address_kr))
            .unwrap_or(NOT_AVAILABLE)
    }

    #[must_use]
    pub fn display_phone(&self) -> &str {
        self.phone.as_deref().and_then(non_blank).unwrap_or(NOT_AVAILABLE)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_coordinates() {
        let coords = Coordinates::new("126.9780", "37.5665");
        assert_eq!(coords.position(), Some(GeoPoint { lat: 37.5665, lng: 126.978 }));
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        assert!(Coordinates::new("NaN", "37.5").position().is_none());
        assert!(Coordinates::new("126.9", "abc").position().is_none());
        assert!(Coordinates::new("", "").position().is_none());
        assert!(Coordinates::new("inf", "37.5").position().is_none());
        assert!(Coordinates::new("126.9", "91").position().is_none());
    }

    #[test]
    fn mappable_follows_coordinates() {
        let mut pharmacy = Pharmacy {
            coordinates: Coordinates::new("126.9", "37.5"),
            ..Pharmacy::default()
        };
        assert!(pharmacy.is_mappable());

        pharmacy.coordinates = Coordinates::new("NaN", "37.5");
        assert!(!pharmacy.is_mappable());
    }

    #[test]
    fn display_helpers_fall_back() {
        let pharmacy = Pharmacy {
            name_kr: "온누리약국".to_string(),
            phone: Some("  ".to_string()),
            ..Pharmacy::default()
        };
        assert_eq!(pharmacy.display_name(), "온누리약국");
        assert_eq!(pharmacy.display_address(), NOT_AVAILABLE);
        assert_eq!(pharmacy.display_phone(), NOT_AVAILABLE);
    }
}
