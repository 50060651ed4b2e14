// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable parameters for relationship discovery.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{ElementGeometry, BOX_EPSILON};

/// How two elements on adjacent pages are judged to sit in the same place.
///
/// Drawn positions rarely align exactly, so every variant is a tolerance test
/// rather than geometric equality. Distances are in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CoLocationPolicy {
    /// Centroids no further apart than `max_distance`.
    CentroidDistance { max_distance: f64 },
    /// Bounding-box intersection-over-union of at least `min_iou`.
    BoundingBoxIou { min_iou: f64 },
    /// Either of the two tests passes.
    Either { max_distance: f64, min_iou: f64 },
}

impl CoLocationPolicy {
    /// Applies the policy to two geometries. Empty geometry never matches.
    pub fn co_located(&self, a: &ElementGeometry, b: &ElementGeometry) -> bool {
        let near = |max_distance: f64| {
            a.centroid_distance(b)
                .is_some_and(|d| d <= max_distance)
        };
        let overlapping = |min_iou: f64| a.bbox_iou(b).is_some_and(|iou| iou >= min_iou);

        match *self {
            CoLocationPolicy::CentroidDistance { max_distance } => near(max_distance),
            CoLocationPolicy::BoundingBoxIou { min_iou } => overlapping(min_iou),
            CoLocationPolicy::Either {
                max_distance,
                min_iou,
            } => near(max_distance) || overlapping(min_iou),
        }
    }

    /// How far a candidate's bounding box may sit from the query box and
    /// still pass the policy. Used to size spatial index queries; `None` means
    /// any pair can pass and no pruning is possible.
    pub fn search_margin(&self) -> Option<f64> {
        match *self {
            CoLocationPolicy::CentroidDistance { max_distance } => Some(max_distance.max(0.0)),
            // Positive IoU requires overlapping boxes, or degenerate boxes that
            // coincide within BOX_EPSILON.
            CoLocationPolicy::BoundingBoxIou { min_iou } => (min_iou > 0.0).then_some(BOX_EPSILON),
            CoLocationPolicy::Either {
                max_distance,
                min_iou,
            } => (min_iou > 0.0).then_some(max_distance.max(BOX_EPSILON)),
        }
    }
}

impl Default for CoLocationPolicy {
    fn default() -> Self {
        CoLocationPolicy::Either {
            max_distance: 2.0,
            min_iou: 0.5,
        }
    }
}

/// Configuration for a discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Co-location test for adjacent-page correspondence.
    pub co_location: CoLocationPolicy,
    /// Process pages on the rayon pool.
    pub parallel: bool,
    /// Prune candidate pairs with a grid over bounding boxes.
    pub spatial_index: bool,
    /// Grid cell size in drawing units (only used with `spatial_index`).
    pub cell_size: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            co_location: CoLocationPolicy::default(),
            parallel: true,
            spatial_index: false,
            cell_size: 50.0,
        }
    }
}

impl DiscoveryConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> ElementGeometry {
        ElementGeometry::polygon(&[(x, y), (x, y + size), (x + size, y + size), (x + size, y)])
    }

    #[test]
    fn identical_footprints_are_co_located_under_every_policy() {
        let a = square(100.0, 100.0, 3.0);
        for policy in [
            CoLocationPolicy::CentroidDistance { max_distance: 0.1 },
            CoLocationPolicy::BoundingBoxIou { min_iou: 0.99 },
            CoLocationPolicy::default(),
        ] {
            assert!(policy.co_located(&a, &a.clone()), "{policy:?}");
        }
    }

    #[test]
    fn centroid_distance_threshold() {
        let policy = CoLocationPolicy::CentroidDistance { max_distance: 2.0 };
        assert!(policy.co_located(&square(0.0, 0.0, 3.0), &square(1.5, 0.0, 3.0)));
        assert!(!policy.co_located(&square(0.0, 0.0, 3.0), &square(2.5, 0.0, 3.0)));
    }

    #[test]
    fn iou_threshold() {
        let policy = CoLocationPolicy::BoundingBoxIou { min_iou: 0.5 };
        // IoU = 14 / 18
        assert!(policy.co_located(&square(0.0, 0.0, 4.0), &square(0.0, 0.5, 4.0)));
        // IoU = 1 / 3
        assert!(!policy.co_located(&square(0.0, 0.0, 2.0), &square(1.0, 0.0, 2.0)));
    }

    #[test]
    fn either_accepts_slender_lines_by_distance() {
        let policy = CoLocationPolicy::default();
        let a = ElementGeometry::line(&[(10.0, 0.0), (10.0, 20.0)]);
        let b = ElementGeometry::line(&[(10.5, 0.0), (10.5, 20.0)]);
        // Degenerate boxes do not coincide, but the centroids are 0.5 apart.
        assert_eq!(a.bbox_iou(&b), Some(0.0));
        assert!(policy.co_located(&a, &b));
    }

    #[test]
    fn empty_geometry_never_matches() {
        let policy = CoLocationPolicy::default();
        let empty = ElementGeometry::line(&[]);
        assert!(!policy.co_located(&empty, &square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn config_from_partial_json() {
        let config = DiscoveryConfig::from_json(
            r#"{
                "co_location": { "policy": "centroid_distance", "max_distance": 5.0 },
                "parallel": false
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.co_location,
            CoLocationPolicy::CentroidDistance { max_distance: 5.0 }
        );
        assert!(!config.parallel);
        assert!(!config.spatial_index);
        assert_eq!(config.cell_size, 50.0);
    }

    #[test]
    fn config_rejects_unknown_policy() {
        let err = DiscoveryConfig::from_json(r#"{ "co_location": { "policy": "exact" } }"#);
        assert!(matches!(err, Err(Error::Serialization(_))));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = DiscoveryConfig::from_file("/nonexistent/discovery.json").unwrap_err();
        assert!(matches!(&err, Error::Io { path, .. } if path == "/nonexistent/discovery.json"));
        assert!(err.to_string().starts_with("cannot read /nonexistent/discovery.json"));
    }

    #[test]
    fn search_margin_follows_policy() {
        assert_eq!(
            CoLocationPolicy::BoundingBoxIou { min_iou: 0.5 }.search_margin(),
            Some(BOX_EPSILON)
        );
        assert_eq!(CoLocationPolicy::default().search_margin(), Some(2.0));
        assert_eq!(
            CoLocationPolicy::Either {
                max_distance: -100.0,
                min_iou: 0.5
            }
            .search_margin(),
            Some(BOX_EPSILON)
        );
        assert_eq!(
            CoLocationPolicy::CentroidDistance { max_distance: -1.0 }.search_margin(),
            Some(0.0)
        );
        assert_eq!(
            CoLocationPolicy::BoundingBoxIou { min_iou: 0.0 }.search_margin(),
            None
        );
    }
}
