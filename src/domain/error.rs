//! Error types for the yakguk plugin.
//!
//! [`YakgukError`] covers every failure that can cross a module boundary:
//! dataset loading, filesystem access, theme loading, worker messaging and
//! configuration. Hours parsing has its own narrower error type
//! ([`crate::domain::hours::HoursError`]) because it never escapes the status
//! evaluator.

use thiserror::Error;

/// The main error type for yakguk operations.
///
/// Variants carry a human-readable description; `Io` wraps the underlying
/// `std::io::Error` via `#[from]` so `?` works on filesystem calls.
///
/// # Examples
///
/// ```
/// use yakguk::YakgukError;
///
/// fn reject_document() -> Result<(), YakgukError> {
///     Err(YakgukError::Dataset("expected a JSON array".to_string()))
/// }
/// assert!(reject_document().is_err());
/// ```
#[derive(Debug, Error)]
pub enum YakgukError {
    /// The pharmacy dataset could not be parsed.
    ///
    /// Raised when the document is not JSON or is not a top-level array.
    /// Individual malformed records never produce this error; they are
    /// tolerated or skipped.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset or geolocation endpoint answered with a failing HTTP status.
    #[error("HTTP request failed with status {status}")]
    Http {
        /// Status code returned by the remote endpoint.
        status: u16,
    },

    /// The position lookup returned no usable coordinates.
    #[error("Location error: {0}")]
    Location(String),

    /// A request outlived its deadline.
    #[error("{what} timed out after {secs}s")]
    Timeout {
        /// Which request timed out.
        what: &'static str,
        secs: u64,
    },

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// A configuration value is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for yakguk operations.
pub type Result<T> = std::result::Result<T, YakgukError>;
