// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid index over element bounding boxes.
//!
//! A uniform spatial hash that divides the page plane into square cells of
//! side `cell_size`. Each element is registered in every cell its bounding box
//! touches, so a box query returns a superset of the elements whose boxes
//! overlap it. Discovery uses this only to prune candidate pairs; the exact
//! geometric test still runs on every candidate.

use geo::Rect;
use rustc_hash::{FxHashMap, FxHashSet};

/// Upper bound on cells a single box may span before it is treated as
/// covering the whole index.
const MAX_CELLS_PER_BOX: i64 = 4096;

/// A spatial hash grid mapping cells to item indices.
#[derive(Debug)]
pub struct GridIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<usize>>,
    /// Items whose boxes are too large to bucket; returned by every query.
    oversized: Vec<usize>,
    len: usize,
}

impl GridIndex {
    /// Creates an empty index with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            grid: FxHashMap::default(),
            oversized: Vec::new(),
            len: 0,
        }
    }

    /// Builds an index from `(item, bounding box)` pairs. Items without a box
    /// (empty geometry) are skipped.
    pub fn from_rects(
        cell_size: f64,
        rects: impl IntoIterator<Item = (usize, Option<Rect<f64>>)>,
    ) -> Self {
        let mut index = Self::new(cell_size);
        for (item, rect) in rects {
            if let Some(rect) = rect {
                index.insert(item, &rect);
            }
        }
        index
    }

    /// Registers `item` in every cell covered by `rect`.
    pub fn insert(&mut self, item: usize, rect: &Rect<f64>) {
        self.len += 1;
        match self.cell_range(rect) {
            Some((x0, y0, x1, y1)) => {
                for cx in x0..=x1 {
                    for cy in y0..=y1 {
                        self.grid.entry((cx, cy)).or_default().push(item);
                    }
                }
            }
            None => self.oversized.push(item),
        }
    }

    /// Returns the number of indexed items.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns every item registered in a cell touched by `rect`, each once,
    /// in ascending order.
    pub fn query(&self, rect: &Rect<f64>) -> Vec<usize> {
        let mut found: FxHashSet<usize> = self.oversized.iter().copied().collect();

        match self.cell_range(rect) {
            Some((x0, y0, x1, y1)) => {
                for cx in x0..=x1 {
                    for cy in y0..=y1 {
                        if let Some(items) = self.grid.get(&(cx, cy)) {
                            found.extend(items.iter().copied());
                        }
                    }
                }
            }
            None => {
                for items in self.grid.values() {
                    found.extend(items.iter().copied());
                }
            }
        }

        let mut result: Vec<usize> = found.into_iter().collect();
        result.sort_unstable();
        result
    }

    fn cell_range(&self, rect: &Rect<f64>) -> Option<(i64, i64, i64, i64)> {
        let (x0, y0) = self.cell_coords(rect.min().x, rect.min().y)?;
        let (x1, y1) = self.cell_coords(rect.max().x, rect.max().y)?;
        let cells = x1
            .saturating_sub(x0)
            .saturating_add(1)
            .saturating_mul(y1.saturating_sub(y0).saturating_add(1));
        (cells <= MAX_CELLS_PER_BOX).then_some((x0, y0, x1, y1))
    }

    fn cell_coords(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some((
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }

    #[test]
    fn query_finds_overlapping_boxes() {
        let index = GridIndex::from_rects(
            10.0,
            vec![
                (0, Some(rect(0.0, 0.0, 5.0, 5.0))),
                (1, Some(rect(100.0, 100.0, 105.0, 105.0))),
                (2, Some(rect(4.0, 4.0, 30.0, 6.0))),
            ],
        );

        assert_eq!(index.len(), 3);
        assert_eq!(index.query(&rect(1.0, 1.0, 2.0, 2.0)), vec![0, 2]);
        assert_eq!(index.query(&rect(101.0, 101.0, 102.0, 102.0)), vec![1]);
        assert!(index.query(&rect(500.0, 500.0, 501.0, 501.0)).is_empty());
    }

    #[test]
    fn box_spanning_cells_is_found_from_any_of_them() {
        let mut index = GridIndex::new(1.0);
        index.insert(7, &rect(0.5, 0.5, 3.5, 0.5));

        assert_eq!(index.query(&rect(3.2, 0.2, 3.3, 0.3)), vec![7]);
        assert_eq!(index.query(&rect(1.2, 0.2, 1.3, 0.3)), vec![7]);
    }

    #[test]
    fn degenerate_boxes_are_indexed() {
        let mut index = GridIndex::new(10.0);
        index.insert(0, &rect(5.0, 0.0, 5.0, 20.0));
        assert_eq!(index.query(&rect(5.0, 15.0, 5.0, 15.0)), vec![0]);
    }

    #[test]
    fn oversized_boxes_match_every_query() {
        let mut index = GridIndex::new(0.001);
        index.insert(0, &rect(0.0, 0.0, 1000.0, 1000.0));
        index.insert(1, &rect(0.0, 0.0, 0.0005, 0.0005));

        assert_eq!(index.query(&rect(0.0, 0.0, 0.0001, 0.0001)), vec![0, 1]);
        assert_eq!(index.query(&rect(900.0, 900.0, 900.0, 900.0)), vec![0]);
    }

    #[test]
    fn non_positive_cell_size_falls_back() {
        let mut index = GridIndex::new(0.0);
        index.insert(3, &rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(index.query(&rect(0.5, 0.5, 0.5, 0.5)), vec![3]);
    }

    #[test]
    fn empty_geometry_is_skipped() {
        let index = GridIndex::from_rects(1.0, vec![(0, None)]);
        assert!(index.is_empty());
    }
}
