//! Wire-format records for the pharmacy dataset.
//!
//! These types mirror the JSON document as published and are deliberately
//! lenient: absent fields, `null`, and numbers where strings are expected all
//! deserialize without error. Conversion into the domain [`Pharmacy`] happens
//! in [`PharmacyRecord::into_pharmacy`].

use crate::domain::hours::OperatingHours;
use crate::domain::pharmacy::{Coordinates, Pharmacy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the dataset array as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub pharmacy_name_en: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub pharmacy_name_kr: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub address_en: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub address_kr: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient_coordinates")]
    pub coordinates: Option<CoordinatesRecord>,

    /// Weekday abbreviation to `Closed` or `"HH:mm - HH:mm"`.
    ///
    /// Blank values mean no hours; other non-object values mean Closed every day.
    #[serde(default, deserialize_with = "lenient_hours")]
    pub operating_hours: Option<OperatingHours>,
}

/// `coordinates` object; `x` is the longitude, `y` the latitude.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatesRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub x: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub y: Option<String>,
}

impl PharmacyRecord {
    /// Converts the wire record into the domain model.
    ///
    /// Missing text fields become empty strings so display code can fall back
    /// to `N/A`; coordinates stay unparsed.
    #[must_use]
    pub fn into_pharmacy(self) -> Pharmacy {
        let coordinates = self
            .coordinates
            .map(|c| Coordinates::new(c.x.unwrap_or_default(), c.y.unwrap_or_default()))
            .unwrap_or_default();

        Pharmacy {
            name_en: self.pharmacy_name_en.unwrap_or_default(),
            name_kr: self.pharmacy_name_kr.unwrap_or_default(),
            address_en: self.address_en.unwrap_or_default(),
            address_kr: self.address_kr.unwrap_or_default(),
            phone: self.phone,
            coordinates,
            operating_hours: self.operating_hours,
        }
    }
}

impl From<PharmacyRecord> for Pharmacy {
    fn from(record: PharmacyRecord) -> Self {
        record.into_pharmacy()
    }
}

/// Scalar JSON value rendered as text; `null`, arrays and objects yield `None`.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn lenient_coordinates<'de, D>(deserializer: D) -> Result<Option<CoordinatesRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(CoordinatesRecord {
            x: map.get("x").cloned().and_then(scalar_text),
            y: map.get("y").cloned().and_then(scalar_text),
        }),
        _ => None,
    })
}

/// Keeps string day entries as-is and stringifies other scalars so they
/// evaluate to Unknown instead of failing the whole record.
///
/// Blank values (`null`, `false`, `0`, `""`) mean no hours were published.
/// Any other non-object value counts as published hours without a weekday
/// entry, so every day evaluates to Closed.
fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<OperatingHours>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let map = match value {
        None | Some(Value::Null | Value::Bool(false)) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(other) => {
            tracing::debug!(value = %other, "operating_hours is not an object");
            return Ok(Some(OperatingHours::new()));
        }
    };

    let hours = map
        .into_iter()
        .filter_map(|(day, entry)| match entry {
            Value::Null => None,
            Value::String(s) => Some((day, s)),
            other => Some((day, other.to_string())),
        })
        .collect();

    Ok(Some(hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hours::OpenStatus;
    use chrono::NaiveDate;

    #[test]
    fn full_record_converts() {
        let json = r#"{
            "pharmacy_name_en": "Onnuri Pharmacy",
            "pharmacy_name_kr": "온누리약국",
            "address_en": "12 Teheran-ro, Gangnam-gu",
            "address_kr": "서울특별시 강남구 테헤란로 12",
            "phone": "02-123-4567",
            "coordinates": { "x": "127.0276", "y": "37.4979" },
            "operating_hours": { "Mon": "09:00 - 18:00", "Sun": "Closed" }
        }"#;

        let record: PharmacyRecord = serde_json::from_str(json).unwrap();
        let pharmacy = record.into_pharmacy();

        assert_eq!(pharmacy.name_en, "Onnuri Pharmacy");
        assert_eq!(pharmacy.display_phone(), "02-123-4567");
        assert!(pharmacy.is_mappable());
        assert_eq!(pharmacy.operating_hours.as_ref().map(|h| h.len()), Some(2));
    }

    #[test]
    fn missing_fields_default_to_blank() {
        let record: PharmacyRecord = serde_json::from_str("{}").unwrap();
        let pharmacy = record.into_pharmacy();

        assert_eq!(pharmacy.display_name(), "N/A");
        assert!(pharmacy.phone.is_none());
        assert!(pharmacy.operating_hours.is_none());
        assert!(!pharmacy.is_mappable());
    }

    #[test]
    fn numeric_values_are_tolerated() {
        let json = r#"{
            "phone": 21234567,
            "coordinates": { "x": 126.978, "y": 37.5665 }
        }"#;
        let pharmacy = serde_json::from_str::<PharmacyRecord>(json).unwrap().into_pharmacy();

        assert_eq!(pharmacy.phone.as_deref(), Some("21234567"));
        assert!(pharmacy.is_mappable());
    }

    #[test]
    fn null_fields_are_treated_as_missing() {
        let json = r#"{
            "pharmacy_name_en": null,
            "phone": null,
            "coordinates": null,
            "operating_hours": null
        }"#;
        let pharmacy = serde_json::from_str::<PharmacyRecord>(json).unwrap().into_pharmacy();

        assert!(pharmacy.name_en.is_empty());
        assert!(pharmacy.phone.is_none());
        assert!(pharmacy.operating_hours.is_none());
    }

    #[test]
    fn odd_hour_values_evaluate_to_unknown() {
        let json = r#"{ "operating_hours": { "Mon": 900, "Tue": null } }"#;
        let pharmacy = serde_json::from_str::<PharmacyRecord>(json).unwrap().into_pharmacy();
        let hours = pharmacy.operating_hours.as_ref().unwrap();

        assert_eq!(hours.get("Mon").map(String::as_str), Some("900"));
        assert!(!hours.contains_key("Tue"));

        let monday = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        assert_eq!(pharmacy.status_at(monday), OpenStatus::Unknown);
    }

    #[test]
    fn non_object_hours_evaluate_to_closed() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();

        for raw in [r#""24 hours""#, "true", "[1]", "7"] {
            let json = format!(r#"{{ "operating_hours": {raw} }}"#);
            let pharmacy = serde_json::from_str::<PharmacyRecord>(&json).unwrap().into_pharmacy();
            assert_eq!(pharmacy.status_at(monday), OpenStatus::Closed, "{raw}");
        }
    }

    #[test]
    fn blank_hours_mean_no_hours() {
        for raw in ["false", "0", r#""""#] {
            let json = format!(r#"{{ "operating_hours": {raw} }}"#);
            let record: PharmacyRecord = serde_json::from_str(&json).unwrap();
            assert!(record.operating_hours.is_none(), "{raw}");
        }
    }
}
