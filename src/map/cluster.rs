//! Marker layer and distance-based clustering.
//!
//! The layer is rebuilt from scratch from the filtered list on every render.
//! Records without valid coordinates are skipped here and only here; they
//! still appear in the list.

use super::projection::{project, unproject, PixelPoint};
use crate::domain::pharmacy::{GeoPoint, Pharmacy};

/// Markers closer than this many pixels at the current zoom share a cluster.
pub const CLUSTER_RADIUS_PX: f64 = 50.0;

/// One mappable record of the filtered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Index into the filtered list the layer was built from.
    pub index: usize,
    pub position: GeoPoint,
}

/// A group of nearby markers, drawn as a count when it has more than one
/// member and as a pin otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: GeoPoint,
    /// Filtered-list indices, in list order.
    pub members: Vec<usize>,
}

impl Cluster {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
}

/// Running pixel centroid used while clustering.
struct Bucket {
    sum_x: f64,
    sum_y: f64,
    members: Vec<usize>,
}

impl Bucket {
    fn centroid(&self) -> PixelPoint {
        let n = self.members.len() as f64;
        PixelPoint {
            x: self.sum_x / n,
            y: self.sum_y / n,
        }
    }
}

/// Groups markers whose projected distance to a cluster centroid is within
/// `radius_px` at `zoom`.
///
/// Markers are visited in order and each joins the nearest existing cluster
/// in range, or starts a new one. The result is deterministic for a given
/// input order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_markers(markers: &[Marker], zoom: u8, radius_px: f64) -> Vec<Cluster> {
    let _span = tracing::debug_span!("cluster_markers", markers = markers.len(), zoom).entered();

    let mut buckets: Vec<Bucket> = Vec::new();

    for marker in markers {
        let pixel = project(marker.position, zoom);

        let nearest = buckets
            .iter_mut()
            .map(|bucket| {
                let distance = bucket.centroid().distance(pixel);
                (bucket, distance)
            })
            .filter(|(_, distance)| *distance <= radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((bucket, _)) => {
                bucket.sum_x += pixel.x;
                bucket.sum_y += pixel.y;
                bucket.members.push(marker.index);
            }
            None => buckets.push(Bucket {
                sum_x: pixel.x,
                sum_y: pixel.y,
                members: vec![marker.index],
            }),
        }
    }

    let clusters: Vec<Cluster> = buckets
        .into_iter()
        .map(|bucket| Cluster {
            center: unproject(bucket.centroid(), zoom),
            members: bucket.members,
        })
        .collect();

    tracing::debug!(clusters = clusters.len(), "markers clustered");
    clusters
}

/// Markers and clusters for the current filtered list and zoom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    pub markers: Vec<Marker>,
    pub clusters: Vec<Cluster>,
    /// Filtered records left off the map for invalid coordinates.
    pub skipped: usize,
}

impl MarkerLayer {
    /// Builds the layer from the filtered list at `zoom`.
    #[must_use]
    pub fn build(records: &[&Pharmacy], zoom: u8) -> Self {
        let markers: Vec<Marker> = records
            .iter()
            .enumerate()
            .filter_map(|(index, pharmacy)| {
                pharmacy.position().map(|position| Marker { index, position })
            })
            .collect();

        let skipped = records.len() - markers.len();
        if skipped > 0 {
            tracing::debug!(skipped, "records without valid coordinates left off the map");
        }

        let clusters = cluster_markers(&markers, zoom, CLUSTER_RADIUS_PX);

        Self {
            markers,
            clusters,
            skipped,
        }
    }

    /// Cluster containing the given filtered-list index, if it is on the map.
    #[must_use]
    pub fn cluster_of(&self, index: usize) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pharmacy::Coordinates;

    fn at(lat: f64, lng: f64) -> Pharmacy {
        Pharmacy {
            coordinates: Coordinates::new(lng.to_string(), lat.to_string()),
            ..Pharmacy::default()
        }
    }

    #[test]
    fn nearby_markers_share_a_cluster() {
        // ~10 m apart: a couple of pixels at zoom 13
        let records = [at(37.5665, 126.9780), at(37.5666, 126.9781)];
        let refs: Vec<&Pharmacy> = records.iter().collect();

        let layer = MarkerLayer::build(&refs, 13);
        assert_eq!(layer.clusters.len(), 1);
        assert_eq!(layer.clusters[0].members, vec![0, 1]);
        assert!(!layer.clusters[0].is_single());
    }

    #[test]
    fn clusters_split_when_zooming_in() {
        // ~550 m apart: ~37 px at zoom 13, ~2350 px at zoom 19
        let records = [at(37.5665, 126.9780), at(37.5715, 126.9780)];
        let refs: Vec<&Pharmacy> = records.iter().collect();

        assert_eq!(MarkerLayer::build(&refs, 13).clusters.len(), 1);

        let close_up = MarkerLayer::build(&refs, 19);
        assert_eq!(close_up.clusters.len(), 2);
        assert!(close_up.clusters.iter().all(Cluster::is_single));
    }

    #[test]
    fn invalid_coordinates_are_skipped_but_indexed() {
        let mut bad = at(0.0, 0.0);
        bad.coordinates = Coordinates::new("NaN", "37.5");
        let records = [bad, at(37.5665, 126.9780)];
        let refs: Vec<&Pharmacy> = records.iter().collect();

        let layer = MarkerLayer::build(&refs, 13);
        assert_eq!(layer.skipped, 1);
        assert_eq!(layer.markers.len(), 1);
        assert_eq!(layer.markers[0].index, 1);
        assert!(layer.cluster_of(0).is_none());
        assert!(layer.cluster_of(1).is_some());
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        assert!(cluster_markers(&[], 13, CLUSTER_RADIUS_PX).is_empty());
        assert_eq!(MarkerLayer::build(&[], 13), MarkerLayer::default());
    }

    #[test]
    fn single_marker_cluster_sits_on_the_marker() {
        let marker = Marker {
            index: 0,
            position: GeoPoint { lat: 37.5, lng: 127.0 },
        };
        let clusters = cluster_markers(&[marker], 15, CLUSTER_RADIUS_PX);

        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].center.lat - 37.5).abs() < 1e-9);
        assert!((clusters[0].center.lng - 127.0).abs() < 1e-9);
    }
}
