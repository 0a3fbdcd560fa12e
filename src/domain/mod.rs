//! Domain layer for the yakguk plugin.
//!
//! Pure types and logic with no dependency on Zellij APIs:
//!
//! - [`hours`]: open/closed status and night-pharmacy evaluation
//! - [`filter`]: the filter pipeline and its state
//! - [`pharmacy`]: the pharmacy record and coordinate parsing
//! - [`clock`]: the time source used to evaluate hours
//! - [`error`]: error types and result alias

pub mod clock;
pub mod error;
pub mod filter;
pub mod hours;
pub mod pharmacy;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, YakgukError};
pub use filter::{apply_filters, filter_indices, FilterMode, FilterState};
pub use hours::{evaluate_status, is_night_pharmacy, OpenStatus, OperatingHours};
pub use pharmacy::{Coordinates, GeoPoint, Pharmacy};
