// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Same-page intersection search.

use geo::{Geometry, Intersects};

use super::IntersectionPair;
use crate::arena::ElementSet;
use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::keys::ElementKey;
use crate::spatial::GridIndex;

/// Finds every intersecting pair among the elements of one page.
///
/// `keys` must all lie on the same page. Pairs come out ordered by the
/// position of their first element in `keys`, then of the second; within a
/// pair, `a` precedes `b`.
pub(crate) fn page_intersections(
    set: &ElementSet,
    keys: &[ElementKey],
    config: &DiscoveryConfig,
) -> Result<Vec<IntersectionPair>> {
    let prepared: Vec<Geometry<f64>> = keys.iter().map(|&k| set[k].geometry().to_geo()).collect();

    let mut pairs = Vec::new();
    for (i, j) in candidate_pairs(set, keys, config) {
        if !prepared[i].intersects(&prepared[j]) {
            continue;
        }

        let (a, b) = (&set[keys[i]], &set[keys[j]]);
        let point = a
            .geometry()
            .contact_point(b.geometry())
            .ok_or_else(|| Error::DegenerateIntersection {
                a: a.tag().to_string(),
                b: b.tag().to_string(),
            })?;

        pairs.push(IntersectionPair {
            a: keys[i],
            b: keys[j],
            point,
        });
    }

    Ok(pairs)
}

/// Index pairs `(i, j)` with `i < j` worth testing.
fn candidate_pairs(
    set: &ElementSet,
    keys: &[ElementKey],
    config: &DiscoveryConfig,
) -> Vec<(usize, usize)> {
    if !config.spatial_index {
        return (0..keys.len())
            .flat_map(|i| ((i + 1)..keys.len()).map(move |j| (i, j)))
            .collect();
    }

    let rects: Vec<_> = keys.iter().map(|&k| set[k].geometry().bounding_rect()).collect();
    let index = GridIndex::from_rects(config.cell_size, rects.iter().copied().enumerate());

    let mut candidates = Vec::new();
    for (i, rect) in rects.iter().enumerate() {
        let Some(rect) = rect else { continue };
        candidates.extend(index.query(rect).into_iter().filter(|&j| j > i).map(|j| (i, j)));
    }
    candidates
}
