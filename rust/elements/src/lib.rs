// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PaperModels Elements
//!
//! Structural elements traced from multi-page drawings, and the relationships
//! between them.
//!
//! Each [`Element`] is a tagged piece of planar geometry on one page of a
//! drawing set (a beam on the level 2 framing plan, a column on the
//! foundation plan). [`RelationshipDiscovery`] fills in two kinds of links:
//!
//! - **intersections**: same-page elements whose geometries touch, with one
//!   representative contact point per pair;
//! - **correspondents**: elements on the directly adjacent page that sit in
//!   the same place, i.e. the same physical member drawn on two levels.
//!
//! Discovered relationships feed a [`ConnectivityGraph`] for load path and
//! stacking queries, and can be checked with
//! [`ElementSet::validate_relationships`].
//!
//! ```
//! use papermodels_elements::{Element, ElementGeometry, ElementSet, RelationshipDiscovery};
//!
//! let set = ElementSet::from_elements(vec![
//!     Element::new("C0.1", "Column", 0, ElementGeometry::point(10.0, 10.0)),
//!     Element::new("C1.1", "Column", 1, ElementGeometry::point(10.5, 10.0)),
//! ])
//! .unwrap();
//!
//! let found = RelationshipDiscovery::default().discover(&set).unwrap();
//! assert!(found.by_tag("C0.1").unwrap().corresponds_with("C1.1"));
//! assert!(found.by_tag("C1.1").unwrap().corresponds_with("C0.1"));
//! ```

pub mod annotation;
pub mod arena;
pub mod config;
pub mod discovery;
pub mod element;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod keys;
pub mod serialization;
pub mod spatial;
pub mod validation;

pub use annotation::Annotation;
pub use arena::ElementSet;
pub use config::{CoLocationPolicy, DiscoveryConfig};
pub use discovery::{CorrespondencePair, IntersectionPair, RelationshipDiscovery};
pub use element::{Correspondent, Element, Intersection};
pub use error::{Error, Result};
pub use geometry::ElementGeometry;
pub use graph::ConnectivityGraph;
pub use keys::{ElementKey, LinkKind};
pub use spatial::GridIndex;
pub use validation::RelationshipIssue;
