// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjacent-page correspondence search.

use super::CorrespondencePair;
use crate::arena::ElementSet;
use crate::config::DiscoveryConfig;
use crate::geometry::expand_rect;
use crate::keys::ElementKey;
use crate::spatial::GridIndex;

/// Finds every co-located pair between a page (`lower`) and the page directly
/// after it (`upper`).
///
/// Every candidate that passes the co-location policy is kept; when several
/// upper elements match one lower element, all of them are reported.
pub(crate) fn adjacent_correspondences(
    set: &ElementSet,
    lower: &[ElementKey],
    upper: &[ElementKey],
    config: &DiscoveryConfig,
) -> Vec<CorrespondencePair> {
    let policy = config.co_location;
    let margin = if config.spatial_index {
        policy.search_margin()
    } else {
        None
    };
    let index = margin.map(|_| {
        GridIndex::from_rects(
            config.cell_size,
            upper
                .iter()
                .enumerate()
                .map(|(j, &k)| (j, set[k].geometry().bounding_rect())),
        )
    });

    let mut pairs = Vec::new();
    for &a in lower {
        let geometry = set[a].geometry();

        let candidates: Vec<usize> = match (&index, margin) {
            (Some(index), Some(margin)) => match geometry.bounding_rect() {
                Some(rect) => index.query(&expand_rect(&rect, margin)),
                None => Vec::new(),
            },
            _ => (0..upper.len()).collect(),
        };

        pairs.extend(
            candidates
                .into_iter()
                .filter(|&j| policy.co_located(geometry, set[upper[j]].geometry()))
                .map(|j| CorrespondencePair {
                    lower: a,
                    upper: upper[j],
                }),
        );
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoLocationPolicy;
    use crate::element::Element;
    use crate::geometry::ElementGeometry;

    fn column(tag: &str, page: u32, x: f64, y: f64) -> Element {
        Element::new(
            tag,
            "Column",
            page,
            ElementGeometry::polygon(&[(x, y), (x, y + 3.0), (x + 3.0, y + 3.0), (x + 3.0, y)]),
        )
    }

    fn two_floors() -> ElementSet {
        ElementSet::from_elements(vec![
            column("C0.1", 0, 100.0, 100.0),
            column("C0.2", 0, 200.0, 100.0),
            column("C1.1", 1, 100.5, 100.0),
            column("C1.2", 1, 300.0, 300.0),
        ])
        .unwrap()
    }

    fn tags(set: &ElementSet, pairs: &[CorrespondencePair]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| (set[p.lower].tag().to_string(), set[p.upper].tag().to_string()))
            .collect()
    }

    #[test]
    fn matches_approximately_aligned_columns() {
        let set = two_floors();
        let config = DiscoveryConfig::default();
        let pairs = adjacent_correspondences(&set, set.page(0), set.page(1), &config);

        assert_eq!(tags(&set, &pairs), vec![("C0.1".to_string(), "C1.1".to_string())]);
    }

    #[test]
    fn spatial_index_gives_identical_pairs() {
        let set = two_floors();
        let config = DiscoveryConfig {
            spatial_index: true,
            cell_size: 10.0,
            ..Default::default()
        };
        let indexed = adjacent_correspondences(&set, set.page(0), set.page(1), &config);
        let brute =
            adjacent_correspondences(&set, set.page(0), set.page(1), &DiscoveryConfig::default());

        assert_eq!(indexed, brute);
    }

    #[test]
    fn ambiguous_stacking_keeps_every_candidate() {
        let set = ElementSet::from_elements(vec![
            column("C0.1", 0, 100.0, 100.0),
            column("C1.1", 1, 100.0, 100.0),
            column("C1.2", 1, 101.0, 100.0),
        ])
        .unwrap();

        let config = DiscoveryConfig::default();
        let pairs = adjacent_correspondences(&set, set.page(0), set.page(1), &config);
        assert_eq!(
            tags(&set, &pairs),
            vec![
                ("C0.1".to_string(), "C1.1".to_string()),
                ("C0.1".to_string(), "C1.2".to_string()),
            ]
        );
    }

    #[test]
    fn nearly_coincident_posts_match_across_cell_edge() {
        let set = ElementSet::from_elements(vec![
            Element::new("P0.1", "Post", 0, ElementGeometry::point(50.0 - 1e-10, 10.0)),
            Element::new("P1.1", "Post", 1, ElementGeometry::point(50.0, 10.0)),
        ])
        .unwrap();

        for policy in [
            CoLocationPolicy::BoundingBoxIou { min_iou: 0.5 },
            CoLocationPolicy::Either {
                max_distance: -100.0,
                min_iou: 0.5,
            },
        ] {
            let brute = DiscoveryConfig {
                co_location: policy,
                ..Default::default()
            };
            let indexed = DiscoveryConfig {
                spatial_index: true,
                cell_size: 50.0,
                ..brute.clone()
            };

            let expected = adjacent_correspondences(&set, set.page(0), set.page(1), &brute);
            assert_eq!(
                tags(&set, &expected),
                vec![("P0.1".to_string(), "P1.1".to_string())],
                "{policy:?}"
            );
            assert_eq!(
                adjacent_correspondences(&set, set.page(0), set.page(1), &indexed),
                expected,
                "{policy:?}"
            );
        }
    }

    #[test]
    fn unbounded_policy_disables_pruning() {
        let set = two_floors();
        let config = DiscoveryConfig {
            co_location: CoLocationPolicy::BoundingBoxIou { min_iou: 0.0 },
            spatial_index: true,
            ..Default::default()
        };

        // IoU >= 0 accepts every pair, so nothing may be pruned.
        let pairs = adjacent_correspondences(&set, set.page(0), set.page(1), &config);
        assert_eq!(pairs.len(), 4);
    }
}
