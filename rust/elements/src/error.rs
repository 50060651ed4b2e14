// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for element sets and relationship discovery.

/// Result type alias for element operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building element sets or discovering
/// relationships.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An element with this tag is already present in the set.
    #[error("duplicate element tag: {0}")]
    DuplicateTag(String),

    /// A referenced tag does not name any element in the set.
    #[error("unknown element tag: {0}")]
    UnknownTag(String),

    /// The intersection predicate reported contact but no contact point could
    /// be derived from the two geometries.
    #[error("elements {a} and {b} intersect but yield no contact point")]
    DegenerateIntersection { a: String, b: String },

    /// An annotation record cannot be turned into a geometry.
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// The annotation's object type has no geometric interpretation.
    #[error("unsupported annotation object type: {0}")]
    UnsupportedObjectType(String),

    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
