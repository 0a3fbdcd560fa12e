//! Dataset source abstraction.
//!
//! This module defines the [`PharmacySource`] trait that abstracts over where
//! the pharmacy list comes from. The worker thread loads through this trait
//! so the file-backed source can be swapped in tests without touching the
//! worker protocol.
//!
//! The HTTP source is not an implementor: Zellij web requests are
//! asynchronous plugin events, so a URL dataset is fetched by the plugin shim
//! and handed straight to [`crate::storage::parse_dataset`].

use crate::domain::error::Result;
use crate::domain::pharmacy::Pharmacy;

/// A read-only source of pharmacy records.
///
/// # Implementations
///
/// - [`crate::storage::JsonDataset`]: a JSON array file on disk (default)
///
/// # Examples
///
/// ```no_run
/// use yakguk::storage::{JsonDataset, PharmacySource};
/// use std::path::PathBuf;
///
/// let source = JsonDataset::new(PathBuf::from("/host/pharmacy_data.json"));
/// let pharmacies = source.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PharmacySource: Send {
    /// Loads the complete dataset.
    ///
    /// Records keep the order in which the source lists them; the filter
    /// pipeline relies on that order being stable.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not a JSON array.
    fn load(&self) -> Result<Vec<Pharmacy>>;

    /// Human-readable description of the source for logs.
    fn describe(&self) -> String;
}
