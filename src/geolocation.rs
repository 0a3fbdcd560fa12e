//! User position lookup.
//!
//! The sandbox has no device location API, so the position comes from one of
//! two places: an IP geolocation endpoint (`location_url`) fetched with a
//! Zellij web request, or a fixed `home_location` from configuration. Either
//! way a failure is only logged; the map keeps its current view.

use crate::domain::error::{Result, YakgukError};
use crate::domain::pharmacy::GeoPoint;
use serde_json::{Map, Value};

/// Latitude/longitude key pairs tried in order.
const KEY_PAIRS: [(&str, &str); 3] = [("lat", "lon"), ("latitude", "longitude"), ("lat", "lng")];

/// Extracts a position from an IP geolocation response body.
///
/// Accepts `lat`/`lon`, `latitude`/`longitude` or `lat`/`lng`, as numbers or
/// numeric strings, at the top level or under a `location` object.
///
/// # Errors
///
/// Returns [`YakgukError::Location`] if the body is not a JSON object or
/// carries no valid coordinate pair.
pub fn parse_location_response(body: &[u8]) -> Result<GeoPoint> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| YakgukError::Location(format!("invalid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(YakgukError::Location("expected a JSON object".to_string()));
    };

    find_point(&object)
        .or_else(|| match object.get("location") {
            Some(Value::Object(nested)) => find_point(nested),
            _ => None,
        })
        .ok_or_else(|| YakgukError::Location("no coordinates in response".to_string()))
}

fn find_point(object: &Map<String, Value>) -> Option<GeoPoint> {
    KEY_PAIRS.iter().find_map(|(lat_key, lng_key)| {
        let lat = number(object.get(*lat_key)?)?;
        let lng = number(object.get(*lng_key)?)?;
        GeoPoint::new(lat, lng)
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a `home_location` setting of the form `lat,lng`.
///
/// # Errors
///
/// Returns [`YakgukError::Config`] if the value is not two comma separated
/// numbers inside the valid coordinate range.
///
/// # Examples
///
/// ```
/// use yakguk::geolocation::parse_home_location;
///
/// let home = parse_home_location("37.5665, 126.9780").unwrap();
/// assert_eq!(home.lat, 37.5665);
/// assert!(parse_home_location("seoul").is_err());
/// ```
pub fn parse_home_location(raw: &str) -> Result<GeoPoint> {
    let invalid = || YakgukError::Config(format!("home_location must be 'lat,lng', got '{raw}'"));

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    GeoPoint::new(lat, lng).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lat_lon_numbers() {
        let point = parse_location_response(br#"{"status":"success","lat":37.5,"lon":127.0}"#).unwrap();
        assert_eq!(point, GeoPoint { lat: 37.5, lng: 127.0 });
    }

    #[test]
    fn reads_latitude_longitude_strings() {
        let point =
            parse_location_response(br#"{"latitude":"37.56","longitude":"126.97"}"#).unwrap();
        assert_eq!(point, GeoPoint { lat: 37.56, lng: 126.97 });
    }

    #[test]
    fn reads_nested_location_object() {
        let point =
            parse_location_response(br#"{"ip":"1.2.3.4","location":{"lat":35.1,"lng":129.0}}"#)
                .unwrap();
        assert_eq!(point, GeoPoint { lat: 35.1, lng: 129.0 });
    }

    #[test]
    fn rejects_responses_without_coordinates() {
        assert!(matches!(
            parse_location_response(br#"{"status":"fail","message":"private range"}"#),
            Err(YakgukError::Location(_))
        ));
        assert!(parse_location_response(b"[37.5, 127.0]").is_err());
        assert!(parse_location_response(b"not json").is_err());
        assert!(parse_location_response(br#"{"lat":"NaN","lon":127.0}"#).is_err());
    }

    #[test]
    fn home_location_requires_a_valid_pair() {
        assert!(parse_home_location("37.5,127.0").is_ok());
        assert!(matches!(parse_home_location("37.5"), Err(YakgukError::Config(_))));
        assert!(parse_home_location("95,127").is_err());
        assert!(parse_home_location("a,b").is_err());
    }
}
