//! Detail popup for a single map marker.

use crate::domain::hours::OpenStatus;
use crate::domain::pharmacy::Pharmacy;
use chrono::NaiveDateTime;

/// Fields shown when a marker is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub name_en: String,
    pub name_kr: String,
    pub address_en: String,
    /// Phone number, or `N/A` when absent.
    pub phone: String,
    pub status: OpenStatus,
    pub night: bool,
}

impl Popup {
    #[must_use]
    pub fn for_pharmacy(pharmacy: &Pharmacy, now: NaiveDateTime) -> Self {
        Self {
            name_en: pharmacy.name_en.clone(),
            name_kr: pharmacy.name_kr.clone(),
            address_en: pharmacy.address_en.clone(),
            phone: pharmacy.display_phone().to_string(),
            status: pharmacy.status_at(now),
            night: pharmacy.is_night_at(now),
        }
    }
}
