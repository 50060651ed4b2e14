// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relationship discovery.
//!
//! Discovery runs in two phases:
//!
//! 1. **Pair search**: every page (for intersections) or every pair of
//!    adjacent pages (for correspondence) is an independent unit of work and
//!    yields a list of symmetric pairs. Units run on the rayon pool when
//!    [`DiscoveryConfig::parallel`] is set.
//! 2. **Merge**: pairs are folded into one accumulator per element, each
//!    accumulator is sorted by the partner's insertion order, and a new
//!    [`ElementSet`] is built with the relationship lists replaced.
//!
//! Input elements are never mutated, and lists are replaced rather than
//! appended to, so running discovery twice gives the same result.

mod correspondence;
mod intersection;

use geo::Point;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::arena::ElementSet;
use crate::config::DiscoveryConfig;
use crate::element::{Correspondent, Element, Intersection};
use crate::error::Result;
use crate::keys::ElementKey;

/// Two same-page elements in contact. `a` precedes `b` in page order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPair {
    pub a: ElementKey,
    pub b: ElementKey,
    /// Representative contact point, shared by both sides.
    pub point: Point<f64>,
}

/// Two co-located elements on pages `p` (`lower`) and `p + 1` (`upper`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrespondencePair {
    pub lower: ElementKey,
    pub upper: ElementKey,
}

/// Computes intersections and correspondents for an [`ElementSet`].
///
/// # Example
///
/// ```
/// use papermodels_elements::{
///     DiscoveryConfig, Element, ElementGeometry, ElementSet, RelationshipDiscovery,
/// };
///
/// let set = ElementSet::from_elements(vec![
///     Element::new(
///         "FB1.1",
///         "Flush Beam",
///         1,
///         ElementGeometry::line(&[(101.5, 52.0), (101.5, 85.3)]),
///     ),
///     Element::new("J1.1", "Joist", 1, ElementGeometry::line(&[(90.0, 65.2), (110.0, 65.2)])),
/// ])
/// .unwrap();
///
/// let found = RelationshipDiscovery::new(DiscoveryConfig::default()).discover(&set).unwrap();
/// assert!(found.by_tag("FB1.1").unwrap().intersection_with("J1.1").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RelationshipDiscovery {
    config: DiscoveryConfig,
}

impl RelationshipDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Runs both passes and returns a new set with intersections and
    /// correspondents replaced.
    pub fn discover(&self, set: &ElementSet) -> Result<ElementSet> {
        let intersections = self.intersection_pairs(set)?;
        let correspondences = self.correspondence_pairs(set);

        let mut touching = intersection_accumulators(&intersections);
        let mut stacked = correspondence_accumulators(&correspondences);
        let ordinals = set.ordinals();

        Ok(set.map_relationships(|key, element| {
            element
                .clone()
                .with_intersections(intersections_for(set, &ordinals, touching.remove(&key)))
                .with_correspondents(correspondents_for(set, &ordinals, stacked.remove(&key)))
        }))
    }

    /// Replaces only the intersection lists.
    pub fn discover_intersections(&self, set: &ElementSet) -> Result<ElementSet> {
        let pairs = self.intersection_pairs(set)?;
        let mut touching = intersection_accumulators(&pairs);
        let ordinals = set.ordinals();

        Ok(set.map_relationships(|key, element| {
            element
                .clone()
                .with_intersections(intersections_for(set, &ordinals, touching.remove(&key)))
        }))
    }

    /// Replaces only the correspondent lists.
    pub fn discover_correspondents(&self, set: &ElementSet) -> Result<ElementSet> {
        let pairs = self.correspondence_pairs(set);
        let mut stacked = correspondence_accumulators(&pairs);
        let ordinals = set.ordinals();

        Ok(set.map_relationships(|key, element| {
            element
                .clone()
                .with_correspondents(correspondents_for(set, &ordinals, stacked.remove(&key)))
        }))
    }

    /// Returns every same-page intersecting pair, page by page in ascending
    /// page order.
    pub fn intersection_pairs(&self, set: &ElementSet) -> Result<Vec<IntersectionPair>> {
        let pages: Vec<u32> = set.pages().collect();

        let run = |page: &u32| -> Result<Vec<IntersectionPair>> {
            let keys = set.page(*page);
            let pairs = intersection::page_intersections(set, keys, &self.config)?;
            tracing::debug!(
                page,
                elements = keys.len(),
                intersections = pairs.len(),
                "page intersections"
            );
            Ok(pairs)
        };

        let per_page: Vec<Vec<IntersectionPair>> = if self.config.parallel {
            pages.par_iter().map(run).collect::<Result<_>>()?
        } else {
            pages.iter().map(run).collect::<Result<_>>()?
        };

        let pairs: Vec<IntersectionPair> = per_page.into_iter().flatten().collect();
        tracing::info!(
            elements = set.len(),
            pages = pages.len(),
            intersections = pairs.len(),
            "intersection discovery complete"
        );
        Ok(pairs)
    }

    /// Returns every co-located pair on strictly adjacent pages. Pages whose
    /// indices differ by more than one are never compared.
    pub fn correspondence_pairs(&self, set: &ElementSet) -> Vec<CorrespondencePair> {
        let pages: Vec<u32> = set.pages().collect();
        let adjacent: Vec<(u32, u32)> = pages
            .windows(2)
            .filter(|w| w[1] - w[0] == 1)
            .map(|w| (w[0], w[1]))
            .collect();

        let run = |&(lower, upper): &(u32, u32)| -> Vec<CorrespondencePair> {
            let pairs = correspondence::adjacent_correspondences(
                set,
                set.page(lower),
                set.page(upper),
                &self.config,
            );
            tracing::debug!(lower, upper, correspondences = pairs.len(), "page correspondences");
            pairs
        };

        let per_pair: Vec<Vec<CorrespondencePair>> = if self.config.parallel {
            adjacent.par_iter().map(run).collect()
        } else {
            adjacent.iter().map(run).collect()
        };

        let pairs: Vec<CorrespondencePair> = per_pair.into_iter().flatten().collect();
        tracing::info!(
            elements = set.len(),
            page_pairs = adjacent.len(),
            correspondences = pairs.len(),
            "correspondence discovery complete"
        );
        pairs
    }
}

type Accumulators<T> = FxHashMap<ElementKey, Vec<(ElementKey, T)>>;

fn intersection_accumulators(pairs: &[IntersectionPair]) -> Accumulators<Point<f64>> {
    let mut acc: Accumulators<Point<f64>> = FxHashMap::default();
    for pair in pairs {
        acc.entry(pair.a).or_default().push((pair.b, pair.point));
        acc.entry(pair.b).or_default().push((pair.a, pair.point));
    }
    acc
}

fn correspondence_accumulators(pairs: &[CorrespondencePair]) -> Accumulators<()> {
    let mut acc: Accumulators<()> = FxHashMap::default();
    for pair in pairs {
        acc.entry(pair.lower).or_default().push((pair.upper, ()));
        acc.entry(pair.upper).or_default().push((pair.lower, ()));
    }
    acc
}

fn sorted<T>(
    ordinals: &FxHashMap<ElementKey, usize>,
    found: Option<Vec<(ElementKey, T)>>,
) -> Vec<(ElementKey, T)> {
    let mut found = found.unwrap_or_default();
    found.sort_by_key(|(other, _)| ordinals.get(other).copied().unwrap_or(usize::MAX));
    found
}

fn intersections_for(
    set: &ElementSet,
    ordinals: &FxHashMap<ElementKey, usize>,
    found: Option<Vec<(ElementKey, Point<f64>)>>,
) -> Vec<Intersection> {
    sorted(ordinals, found)
        .into_iter()
        .map(|(other, point)| Intersection::new(set[other].tag(), point))
        .collect()
}

fn correspondents_for(
    set: &ElementSet,
    ordinals: &FxHashMap<ElementKey, usize>,
    found: Option<Vec<(ElementKey, ())>>,
) -> Vec<Correspondent> {
    sorted(ordinals, found)
        .into_iter()
        .map(|(other, ())| {
            let partner: &Element = &set[other];
            Correspondent::new(partner.tag(), partner.geometry().clone())
        })
        .collect()
}
