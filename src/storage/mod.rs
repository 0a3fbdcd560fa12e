//! Storage layer for the pharmacy dataset.
//!
//! The dataset is read-only: it is loaded once, converted into domain
//! [`crate::domain::Pharmacy`] values and never persisted back.
//!
//! # Modules
//!
//! - `backend`: the [`PharmacySource`] trait over dataset sources
//! - `json`: JSON file loader and the shared document parser
//! - `models`: lenient wire-format records separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PharmacySource;
pub use json::{parse_dataset, JsonDataset};
pub use models::{CoordinatesRecord, PharmacyRecord};
