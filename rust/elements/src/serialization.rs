// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON interchange for element sets.
//!
//! Elements are written in insertion order with their relationship lists.
//! Geometry uses a GeoJSON-like shape (`{"type": "line", "coordinates": ...}`)
//! with lowercase type names. Correspondents are written in full; on input a
//! correspondent may also be given as a bare tag, in which case its geometry
//! is taken from the element with that tag.

use geo::{Coord, LineString, Point, Polygon};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::ElementSet;
use crate::element::{Correspondent, Element, Intersection};
use crate::error::{Error, Result};
use crate::geometry::ElementGeometry;

/// Serializable representation of an element set.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetSnapshot {
    pub elements: Vec<ElementSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    pub element_type: String,
    pub page: u32,
    pub geometry: GeometrySnapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<IntersectionSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correspondents: Vec<CorrespondentSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum GeometrySnapshot {
    Point([f64; 2]),
    Line(Vec<[f64; 2]>),
    /// Exterior ring first, then holes.
    Polygon(Vec<Vec<[f64; 2]>>),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntersectionSnapshot {
    pub tag: String,
    pub point: [f64; 2],
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrespondentSnapshot {
    Tag(String),
    Full { tag: String, geometry: GeometrySnapshot },
}

impl CorrespondentSnapshot {
    fn tag(&self) -> &str {
        match self {
            CorrespondentSnapshot::Tag(tag) | CorrespondentSnapshot::Full { tag, .. } => tag,
        }
    }
}

impl From<&ElementGeometry> for GeometrySnapshot {
    fn from(geometry: &ElementGeometry) -> Self {
        fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> {
            ls.coords().map(|c| [c.x, c.y]).collect()
        }

        match geometry {
            ElementGeometry::Point(p) => GeometrySnapshot::Point([p.x(), p.y()]),
            ElementGeometry::Line(ls) => GeometrySnapshot::Line(ring(ls)),
            ElementGeometry::Polygon(poly) => GeometrySnapshot::Polygon(
                std::iter::once(poly.exterior())
                    .chain(poly.interiors())
                    .map(ring)
                    .collect(),
            ),
        }
    }
}

impl From<&GeometrySnapshot> for ElementGeometry {
    fn from(snapshot: &GeometrySnapshot) -> Self {
        fn ring(coords: &[[f64; 2]]) -> LineString<f64> {
            coords.iter().map(|&[x, y]| Coord { x, y }).collect()
        }

        match snapshot {
            GeometrySnapshot::Point([x, y]) => ElementGeometry::point(*x, *y),
            GeometrySnapshot::Line(coords) => ElementGeometry::Line(ring(coords)),
            GeometrySnapshot::Polygon(rings) => {
                let mut rings = rings.iter().map(|r| ring(r));
                let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
                ElementGeometry::Polygon(Polygon::new(exterior, rings.collect()))
            }
        }
    }
}

impl ElementSet {
    /// Serializes the set to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot of the set.
    pub fn to_snapshot(&self) -> SetSnapshot {
        let elements = self
            .elements()
            .map(|element| ElementSnapshot {
                tag: element.tag().to_string(),
                element_type: element.element_type().to_string(),
                page: element.page(),
                geometry: element.geometry().into(),
                intersections: element
                    .intersections()
                    .iter()
                    .map(|i| IntersectionSnapshot {
                        tag: i.tag.clone(),
                        point: [i.point.x(), i.point.y()],
                    })
                    .collect(),
                correspondents: element
                    .correspondents()
                    .iter()
                    .map(|c| CorrespondentSnapshot::Full {
                        tag: c.tag.clone(),
                        geometry: (&c.geometry).into(),
                    })
                    .collect(),
                page_label: element.page_label().map(str::to_string),
            })
            .collect();

        SetSnapshot { elements }
    }

    /// Deserializes a set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SetSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Rebuilds a set from a snapshot.
    ///
    /// Fails with [`Error::DuplicateTag`] on repeated tags and with
    /// [`Error::UnknownTag`] when a bare correspondent tag names no element.
    pub fn from_snapshot(snapshot: SetSnapshot) -> Result<Self> {
        let geometries: FxHashMap<&str, ElementGeometry> = snapshot
            .elements
            .iter()
            .map(|e| (e.tag.as_str(), ElementGeometry::from(&e.geometry)))
            .collect();

        let mut set = Self::new();
        for e in &snapshot.elements {
            let correspondents = e
                .correspondents
                .iter()
                .map(|c| {
                    let geometry: ElementGeometry = match c {
                        CorrespondentSnapshot::Full { geometry, .. } => geometry.into(),
                        CorrespondentSnapshot::Tag(tag) => geometries
                            .get(tag.as_str())
                            .cloned()
                            .ok_or_else(|| Error::UnknownTag(tag.clone()))?,
                    };
                    Ok(Correspondent::new(c.tag(), geometry))
                })
                .collect::<Result<Vec<_>>>()?;

            let intersections = e
                .intersections
                .iter()
                .map(|i| Intersection::new(i.tag.as_str(), Point::new(i.point[0], i.point[1])))
                .collect();

            let geometry = ElementGeometry::from(&e.geometry);
            let mut element =
                Element::new(e.tag.as_str(), e.element_type.as_str(), e.page, geometry)
                    .with_intersections(intersections)
                    .with_correspondents(correspondents);
            if let Some(label) = &e.page_label {
                element = element.with_page_label(label.as_str());
            }
            set.insert(element)?;
        }

        Ok(set)
    }
}
