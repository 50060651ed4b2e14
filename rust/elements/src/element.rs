// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The element record.
//!
//! An [`Element`] is one structural item (beam, column, joist, ...) drawn on
//! one page. Its tag, type, page and geometry are fixed at construction. The
//! `intersections` and `correspondents` lists are a snapshot of whatever the
//! last discovery pass produced: an element never computes them itself, and
//! nothing keeps them up to date when other elements change.

use geo::Point;

use crate::geometry::ElementGeometry;

/// A same-page contact with another element.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Tag of the other element.
    pub tag: String,
    /// Representative contact point.
    pub point: Point<f64>,
}

impl Intersection {
    pub fn new(tag: impl Into<String>, point: Point<f64>) -> Self {
        Self {
            tag: tag.into(),
            point,
        }
    }
}

/// An adjacent-page element judged to occupy the same planar position.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondent {
    /// Tag of the other element.
    pub tag: String,
    /// Geometry of the other element, as drawn on its page.
    pub geometry: ElementGeometry,
}

impl Correspondent {
    pub fn new(tag: impl Into<String>, geometry: ElementGeometry) -> Self {
        Self {
            tag: tag.into(),
            geometry,
        }
    }
}

/// A structural element on a drawing page.
///
/// Construction performs no validation: tag uniqueness is checked when the
/// element is inserted into an [`ElementSet`](crate::ElementSet), and
/// geometry validity is left to the ingestion stage.
///
/// # Example
///
/// ```
/// use papermodels_elements::{Element, ElementGeometry};
///
/// let beam = Element::new(
///     "FB1.1",
///     "Flush Beam",
///     1,
///     ElementGeometry::line(&[(101.5, 52.0), (101.5, 85.3)]),
/// );
///
/// assert!(beam.intersections().is_empty());
/// assert!(beam.page_label().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    element_type: String,
    page: u32,
    geometry: ElementGeometry,
    intersections: Vec<Intersection>,
    correspondents: Vec<Correspondent>,
    page_label: Option<String>,
}

impl Element {
    /// Creates an element with empty relationship lists and no page label.
    pub fn new(
        tag: impl Into<String>,
        element_type: impl Into<String>,
        page: u32,
        geometry: ElementGeometry,
    ) -> Self {
        Self {
            tag: tag.into(),
            element_type: element_type.into(),
            page,
            geometry,
            intersections: Vec::new(),
            correspondents: Vec::new(),
            page_label: None,
        }
    }

    /// Sets the descriptive page label (e.g. "L02").
    pub fn with_page_label(mut self, label: impl Into<String>) -> Self {
        self.page_label = Some(label.into());
        self
    }

    /// Replaces the intersection list.
    pub fn with_intersections(mut self, intersections: Vec<Intersection>) -> Self {
        self.intersections = intersections;
        self
    }

    /// Replaces the correspondent list.
    pub fn with_correspondents(mut self, correspondents: Vec<Correspondent>) -> Self {
        self.correspondents = correspondents;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Free-form classification such as "Flush Beam" or "Column".
    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn geometry(&self) -> &ElementGeometry {
        &self.geometry
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn correspondents(&self) -> &[Correspondent] {
        &self.correspondents
    }

    pub fn page_label(&self) -> Option<&str> {
        self.page_label.as_deref()
    }

    /// Returns `true` if both records describe the same entity. Identity is
    /// the tag alone; geometry and relationships are ignored.
    pub fn same_entity(&self, other: &Element) -> bool {
        self.tag == other.tag
    }

    /// Returns the recorded contact with `tag`, if any.
    pub fn intersection_with(&self, tag: &str) -> Option<&Intersection> {
        self.intersections.iter().find(|i| i.tag == tag)
    }

    /// Returns `true` if `tag` is among the recorded correspondents.
    pub fn corresponds_with(&self, tag: &str) -> bool {
        self.correspondents.iter().any(|c| c.tag == tag)
    }

    /// Tags of all intersecting elements, in list order.
    pub fn intersection_tags(&self) -> impl Iterator<Item = &str> {
        self.intersections.iter().map(|i| i.tag.as_str())
    }

    /// Tags of all corresponding elements, in list order.
    pub fn correspondent_tags(&self) -> impl Iterator<Item = &str> {
        self.correspondents.iter().map(|c| c.tag.as_str())
    }
}
