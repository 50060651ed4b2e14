// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based element storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid for the lifetime of
//! the [`ElementSet`](crate::ElementSet) that issued them. Tags remain the
//! portable identity; keys are only meaningful inside one set.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an element stored in an [`ElementSet`](crate::ElementSet).
    pub struct ElementKey;
}

/// Kind of relationship between two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
    /// Same-page geometric contact.
    Intersection = 0,
    /// Adjacent-page positional match.
    Correspondence = 1,
}

impl LinkKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Intersection => "intersection",
            LinkKind::Correspondence => "correspondence",
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
