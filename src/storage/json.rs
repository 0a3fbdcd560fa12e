//! JSON dataset loading.
//!
//! The dataset is a single JSON array of pharmacy objects. It is read once at
//! startup and never written back.
//!
//! # Parsing Rules
//!
//! - A document that is not a JSON array is a load failure.
//! - Array entries that are not objects are skipped with a warning.
//! - Object entries never fail: missing or oddly typed fields degrade to
//!   blanks (see [`crate::storage::models`]).
//!
//! # File Format
//!
//! ```json
//! [
//!   {
//!     "pharmacy_name_en": "Onnuri Pharmacy",
//!     "pharmacy_name_kr": "온누리약국",
//!     "address_en": "12 Teheran-ro, Gangnam-gu, Seoul",
//!     "address_kr": "서울특별시 강남구 테헤란로 12",
//!     "phone": "02-123-4567",
//!     "coordinates": { "x": "127.0276", "y": "37.4979" },
//!     "operating_hours": { "Mon": "09:00 - 18:00", "Sun": "Closed" }
//!   }
//! ]
//! ```

use crate::domain::error::{Result, YakgukError};
use crate::domain::pharmacy::Pharmacy;
use crate::storage::backend::PharmacySource;
use crate::storage::models::PharmacyRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Parses a dataset document into pharmacies, preserving array order.
///
/// # Errors
///
/// Returns [`YakgukError::Dataset`] if the bytes are not valid JSON or the
/// top-level value is not an array.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<Pharmacy>> {
    let _span = tracing::debug_span!("parse_dataset", bytes = bytes.len()).entered();

    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| YakgukError::Dataset(format!("invalid JSON: {e}")))?;

    let Value::Array(entries) = document else {
        return Err(YakgukError::Dataset(format!(
            "expected a JSON array, found {}",
            json_kind(&document)
        )));
    };

    let total = entries.len();
    let mut pharmacies = Vec::with_capacity(total);

    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(index, kind = json_kind(&entry), "skipping non-object dataset entry");
            continue;
        }
        match serde_json::from_value::<PharmacyRecord>(entry) {
            Ok(record) => pharmacies.push(record.into_pharmacy()),
            Err(e) => tracing::warn!(index, error = %e, "skipping unreadable dataset entry"),
        }
    }

    tracing::debug!(total, loaded = pharmacies.len(), "dataset parsed");
    Ok(pharmacies)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Dataset backed by a JSON file.
///
/// The file is read on every [`PharmacySource::load`] call; the plugin only
/// calls it once per session.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    file_path: PathBuf,
}

impl JsonDataset {
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl PharmacySource for JsonDataset {
    fn load(&self) -> Result<Vec<Pharmacy>> {
        let _span = tracing::debug_span!("json_dataset_load", path = ?self.file_path).entered();

        let bytes = std::fs::read(&self.file_path)?;
        tracing::debug!(bytes = bytes.len(), "dataset file read");

        parse_dataset(&bytes)
    }

    fn describe(&self) -> String {
        self.file_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_records_in_order() {
        let file = write_dataset(
            r#"[
                {"pharmacy_name_en": "First", "coordinates": {"x": "126.9", "y": "37.5"}},
                {"pharmacy_name_en": "Second"},
                {"pharmacy_name_en": "Third"}
            ]"#,
        );

        let pharmacies = JsonDataset::new(file.path().to_path_buf()).load().unwrap();
        let names: Vec<&str> = pharmacies.iter().map(|p| p.name_en.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDataset::new(dir.path().join("absent.json"));

        assert!(matches!(source.load(), Err(YakgukError::Io(_))));
    }

    #[test]
    fn non_array_document_fails() {
        let file = write_dataset(r#"{"pharmacies": []}"#);
        let result = JsonDataset::new(file.path().to_path_buf()).load();

        assert!(matches!(result, Err(YakgukError::Dataset(msg)) if msg.contains("object")));
    }

    #[test]
    fn malformed_json_fails() {
        assert!(matches!(parse_dataset(b"[{"), Err(YakgukError::Dataset(_))));
        assert!(matches!(parse_dataset(b""), Err(YakgukError::Dataset(_))));
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let pharmacies =
            parse_dataset(br#"[1, "text", null, {"pharmacy_name_en": "Kept"}, []]"#).unwrap();

        assert_eq!(pharmacies.len(), 1);
        assert_eq!(pharmacies[0].name_en, "Kept");
    }

    #[test]
    fn empty_array_loads_empty() {
        assert!(parse_dataset(b"[]").unwrap().is_empty());
    }

    #[test]
    fn describe_names_the_file() {
        let source = JsonDataset::new(PathBuf::from("/host/pharmacy_data.json"));
        assert_eq!(source.describe(), "/host/pharmacy_data.json");
        assert_eq!(source.path(), Path::new("/host/pharmacy_data.json"));
    }
}
