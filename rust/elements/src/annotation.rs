// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PDF markup annotations as element input.
//!
//! Annotations arrive from the markup reader as flat records: an object type
//! name, a flat `[x0, y0, x1, y1, ...]` vertex list in page coordinates, and
//! drawing style. Only the object type and vertices matter for geometry; the
//! style fields are carried so callers can group annotations by how they were
//! drawn.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Error, Result};
use crate::geometry::ElementGeometry;

/// Object types read as closed polygons.
const POLYGON_TYPES: &[&str] = &["polygon", "square", "rectangle", "rectangle sketch to scale"];

/// Object types read as open line strings.
const LINE_TYPES: &[&str] = &["line", "polyline"];

/// A single markup annotation from a PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub object_type: String,
    /// Flat vertex list: x and y alternate.
    pub vertices: Vec<f64>,
    pub line_type: String,
    pub line_weight: f64,
    pub line_color: Vec<f64>,
    pub line_opacity: f64,
    pub fill_color: Vec<f64>,
    pub fill_opacity: f64,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            object_type: String::new(),
            vertices: Vec::new(),
            line_type: "solid".to_string(),
            line_weight: 1.0,
            line_color: vec![0.0, 0.0, 0.0],
            line_opacity: 1.0,
            fill_color: vec![1.0, 1.0, 1.0],
            fill_opacity: 0.0,
        }
    }
}

impl Annotation {
    /// Creates an annotation with default style.
    pub fn new(object_type: impl Into<String>, vertices: Vec<f64>) -> Self {
        Self {
            object_type: object_type.into(),
            vertices,
            ..Default::default()
        }
    }

    /// Converts the vertex list into an element geometry.
    ///
    /// Object type names are matched case-insensitively. A line annotation
    /// with a single vertex becomes a point.
    pub fn to_geometry(&self) -> Result<ElementGeometry> {
        let kind = self.object_type.trim().to_lowercase();
        let is_polygon = POLYGON_TYPES.contains(&kind.as_str());
        if !is_polygon && !LINE_TYPES.contains(&kind.as_str()) {
            return Err(Error::UnsupportedObjectType(self.object_type.clone()));
        }

        let coords = self.coordinates()?;
        match (is_polygon, coords.len()) {
            (_, 0) => Err(Error::InvalidAnnotation(format!(
                "{} annotation has no vertices",
                self.object_type
            ))),
            (true, n) if n < 3 => Err(Error::InvalidAnnotation(format!(
                "{} annotation needs at least 3 vertices, got {n}",
                self.object_type
            ))),
            (true, _) => Ok(ElementGeometry::polygon(&coords)),
            (false, 1) => Ok(ElementGeometry::point(coords[0].0, coords[0].1)),
            (false, _) => Ok(ElementGeometry::line(&coords)),
        }
    }

    /// Builds an element from this annotation.
    pub fn into_element(
        self,
        tag: impl Into<String>,
        element_type: impl Into<String>,
        page: u32,
    ) -> Result<Element> {
        let geometry = self.to_geometry()?;
        Ok(Element::new(tag, element_type, page, geometry))
    }

    fn coordinates(&self) -> Result<Vec<(f64, f64)>> {
        if self.vertices.len() % 2 != 0 {
            return Err(Error::InvalidAnnotation(format!(
                "odd vertex list length {}",
                self.vertices.len()
            )));
        }
        Ok(self.vertices.chunks_exact(2).map(|xy| (xy[0], xy[1])).collect())
    }
}
