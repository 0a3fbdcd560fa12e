//! Terminal map panel model.
//!
//! Pure geometry and layout for the map panel; drawing lives in
//! [`crate::ui::components::map`].
//!
//! - [`projection`]: Web Mercator world pixels
//! - [`view`]: center/zoom viewport and cell mapping
//! - [`cluster`]: marker layer and clustering
//! - [`popup`]: marker detail fields

pub mod cluster;
pub mod popup;
pub mod projection;
pub mod view;

pub use cluster::{cluster_markers, Cluster, Marker, MarkerLayer, CLUSTER_RADIUS_PX};
pub use popup::Popup;
pub use projection::{project, unproject, PixelPoint};
pub use view::{MapView, DEFAULT_CENTER, DEFAULT_ZOOM, LOCATE_ZOOM, SELECT_ZOOM};
