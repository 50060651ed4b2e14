// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the elements of one processing run.
//!
//! The [`ElementSet`] owns every element in a slot map with stable keys and
//! keeps two indices next to it:
//!
//! - tag → key, because tags (not object references) are the portable
//!   identity that relationship lists refer to;
//! - page → keys, in insertion order, because discovery works page by page.
//!
//! Elements are never removed individually. A set is rebuilt or dropped as a
//! whole when a document is re-processed.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::keys::ElementKey;

/// The set of elements under consideration, with tag and page indices.
///
/// # Example
///
/// ```
/// use papermodels_elements::{Element, ElementGeometry, ElementSet};
///
/// let mut set = ElementSet::new();
/// set.insert(Element::new("C0.1", "Column", 0, ElementGeometry::point(1.0, 1.0)))
///     .unwrap();
///
/// assert_eq!(set.len(), 1);
/// assert!(set.by_tag("C0.1").is_some());
/// let duplicate = Element::new("C0.1", "Column", 1, ElementGeometry::point(1.0, 1.0));
/// assert!(set.insert(duplicate).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementSet {
    pub(crate) elements: SlotMap<ElementKey, Element>,
    /// Keys in insertion order.
    pub(crate) order: Vec<ElementKey>,
    pub(crate) tag_to_key: FxHashMap<String, ElementKey>,
    pub(crate) pages: BTreeMap<u32, Vec<ElementKey>>,
}

impl ElementSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from elements, rejecting duplicate tags.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let mut set = Self::new();
        for element in elements {
            set.insert(element)?;
        }
        Ok(set)
    }

    /// Adds an element. Fails with [`Error::DuplicateTag`] if an element with
    /// the same tag is already present.
    pub fn insert(&mut self, element: Element) -> Result<ElementKey> {
        if self.tag_to_key.contains_key(element.tag()) {
            return Err(Error::DuplicateTag(element.tag().to_string()));
        }

        let tag = element.tag().to_string();
        let page = element.page();
        let key = self.elements.insert(element);

        self.order.push(key);
        self.tag_to_key.insert(tag, key);
        self.pages.entry(page).or_default().push(key);
        Ok(key)
    }

    /// Returns the element for the given key, or `None` if not found.
    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(key)
    }

    /// Returns the element with the given tag.
    pub fn by_tag(&self, tag: &str) -> Option<&Element> {
        self.key_of(tag).and_then(|k| self.elements.get(k))
    }

    /// Returns the key of the element with the given tag.
    pub fn key_of(&self, tag: &str) -> Option<ElementKey> {
        self.tag_to_key.get(tag).copied()
    }

    /// Returns `true` if an element with this tag exists.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tag_to_key.contains_key(tag)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over `(key, element)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementKey, &Element)> {
        self.order.iter().map(move |&k| (k, &self.elements[k]))
    }

    /// Iterates over elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().map(move |&k| &self.elements[k])
    }

    /// Returns the keys of elements on `page`, in insertion order.
    pub fn page(&self, page: u32) -> &[ElementKey] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the populated page indices in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Returns the number of populated pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Position of each key in insertion order, used to order relationship
    /// lists deterministically.
    pub(crate) fn ordinals(&self) -> FxHashMap<ElementKey, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i))
            .collect()
    }

    /// Rebuilds the set with every element passed through `f`. Keys, tags
    /// and pages are preserved because `f` may only touch relationships.
    pub(crate) fn map_relationships(
        &self,
        mut f: impl FnMut(ElementKey, &Element) -> Element,
    ) -> Self {
        let mut elements = self.elements.clone();
        for &key in &self.order {
            let updated = f(key, &self.elements[key]);
            debug_assert!(updated.same_entity(&self.elements[key]));
            elements[key] = updated;
        }

        Self {
            elements,
            order: self.order.clone(),
            tag_to_key: self.tag_to_key.clone(),
            pages: self.pages.clone(),
        }
    }
}

impl std::ops::Index<ElementKey> for ElementSet {
    type Output = Element;

    fn index(&self, key: ElementKey) -> &Element {
        &self.elements[key]
    }
}
