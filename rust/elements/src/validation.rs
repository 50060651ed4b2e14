// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consistency checks for relationship lists.
//!
//! Relationship lists are caches written by discovery (or supplied by the
//! caller), so nothing stops them from drifting out of shape. These checks
//! report every place where a set breaks the relationship contract:
//! intersections stay on one page, correspondents sit on an adjacent page, no
//! element refers to itself, and every link is listed from both ends.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::arena::ElementSet;
use crate::keys::LinkKind;

/// A single violation of the relationship contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipIssue {
    /// `owner` lists `partner`, but no element carries that tag.
    UnknownPartner {
        owner: String,
        partner: String,
        kind: LinkKind,
    },
    /// `owner` lists itself.
    SelfReference { owner: String, kind: LinkKind },
    /// An intersection partner sits on a different page.
    CrossPageIntersection {
        owner: String,
        partner: String,
        owner_page: u32,
        partner_page: u32,
    },
    /// A correspondent does not sit on an adjacent page.
    NonAdjacentCorrespondent {
        owner: String,
        partner: String,
        owner_page: u32,
        partner_page: u32,
    },
    /// `owner` lists `partner` but not the other way round.
    Asymmetric {
        owner: String,
        partner: String,
        kind: LinkKind,
    },
}

impl fmt::Display for RelationshipIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipIssue::UnknownPartner {
                owner,
                partner,
                kind,
            } => write!(f, "{owner}: {kind} partner {partner} does not exist"),
            RelationshipIssue::SelfReference { owner, kind } => {
                write!(f, "{owner}: lists itself as {kind} partner")
            }
            RelationshipIssue::CrossPageIntersection {
                owner,
                partner,
                owner_page,
                partner_page,
            } => write!(
                f,
                "{owner} (page {owner_page}): \
                 intersection partner {partner} is on page {partner_page}"
            ),
            RelationshipIssue::NonAdjacentCorrespondent {
                owner,
                partner,
                owner_page,
                partner_page,
            } => write!(
                f,
                "{owner} (page {owner_page}): \
                 correspondent {partner} is on non-adjacent page {partner_page}"
            ),
            RelationshipIssue::Asymmetric {
                owner,
                partner,
                kind,
            } => write!(f, "{owner}: {kind} with {partner} is not listed by {partner}"),
        }
    }
}

impl ElementSet {
    /// Checks every relationship list in the set. An empty result means the
    /// set is consistent.
    pub fn validate_relationships(&self) -> Vec<RelationshipIssue> {
        let mut issues = Vec::new();

        for element in self.elements() {
            let owner = element.tag();

            for partner in element.intersection_tags() {
                if partner == owner {
                    issues.push(RelationshipIssue::SelfReference {
                        owner: owner.to_string(),
                        kind: LinkKind::Intersection,
                    });
                    continue;
                }
                let Some(other) = self.by_tag(partner) else {
                    issues.push(RelationshipIssue::UnknownPartner {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        kind: LinkKind::Intersection,
                    });
                    continue;
                };
                if other.page() != element.page() {
                    issues.push(RelationshipIssue::CrossPageIntersection {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        owner_page: element.page(),
                        partner_page: other.page(),
                    });
                }
                if other.intersection_with(owner).is_none() {
                    issues.push(RelationshipIssue::Asymmetric {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        kind: LinkKind::Intersection,
                    });
                }
            }

            for partner in element.correspondent_tags() {
                if partner == owner {
                    issues.push(RelationshipIssue::SelfReference {
                        owner: owner.to_string(),
                        kind: LinkKind::Correspondence,
                    });
                    continue;
                }
                let Some(other) = self.by_tag(partner) else {
                    issues.push(RelationshipIssue::UnknownPartner {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        kind: LinkKind::Correspondence,
                    });
                    continue;
                };
                if other.page().abs_diff(element.page()) != 1 {
                    issues.push(RelationshipIssue::NonAdjacentCorrespondent {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        owner_page: element.page(),
                        partner_page: other.page(),
                    });
                }
                if !other.corresponds_with(owner) {
                    issues.push(RelationshipIssue::Asymmetric {
                        owner: owner.to_string(),
                        partner: partner.to_string(),
                        kind: LinkKind::Correspondence,
                    });
                }
            }
        }

        issues
    }

    /// Elements with more than one correspondent on the same adjacent page.
    ///
    /// Discovery never resolves these; they are left for review.
    pub fn ambiguous_correspondents(&self) -> Vec<&str> {
        self.elements()
            .filter(|element| {
                let mut per_page: FxHashMap<u32, usize> = FxHashMap::default();
                for partner in element.correspondent_tags() {
                    if let Some(other) = self.by_tag(partner) {
                        *per_page.entry(other.page()).or_default() += 1;
                    }
                }
                per_page.values().any(|&n| n > 1)
            })
            .map(|element| element.tag())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Correspondent, Element, Intersection};
    use crate::geometry::ElementGeometry;
    use geo::Point;

    fn post(tag: &str, page: u32) -> Element {
        Element::new(tag, "Post", page, ElementGeometry::point(0.0, 0.0))
    }

    fn touching(tag: &str) -> Vec<Intersection> {
        vec![Intersection::new(tag, Point::new(0.0, 0.0))]
    }

    fn stacked(tag: &str) -> Vec<Correspondent> {
        vec![Correspondent::new(tag, ElementGeometry::point(0.0, 0.0))]
    }

    #[test]
    fn consistent_set_has_no_issues() {
        let set = ElementSet::from_elements(vec![
            post("A", 0).with_intersections(touching("B")).with_correspondents(stacked("C")),
            post("B", 0).with_intersections(touching("A")),
            post("C", 1).with_correspondents(stacked("A")),
        ])
        .unwrap();

        assert!(set.validate_relationships().is_empty());
    }

    #[test]
    fn reports_each_kind_of_issue() {
        let set = ElementSet::from_elements(vec![
            post("A", 0)
                .with_intersections(touching("A"))
                .with_correspondents(stacked("missing")),
            post("B", 0).with_intersections(touching("C")),
            post("C", 1).with_intersections(touching("B")),
            post("D", 3).with_correspondents(stacked("A")),
        ])
        .unwrap();

        let issues = set.validate_relationships();
        assert!(issues.contains(&RelationshipIssue::SelfReference {
            owner: "A".into(),
            kind: LinkKind::Intersection,
        }));
        assert!(issues.contains(&RelationshipIssue::UnknownPartner {
            owner: "A".into(),
            partner: "missing".into(),
            kind: LinkKind::Correspondence,
        }));
        assert!(issues.contains(&RelationshipIssue::CrossPageIntersection {
            owner: "B".into(),
            partner: "C".into(),
            owner_page: 0,
            partner_page: 1,
        }));
        assert!(issues.contains(&RelationshipIssue::CrossPageIntersection {
            owner: "C".into(),
            partner: "B".into(),
            owner_page: 1,
            partner_page: 0,
        }));
        assert!(issues.contains(&RelationshipIssue::NonAdjacentCorrespondent {
            owner: "D".into(),
            partner: "A".into(),
            owner_page: 3,
            partner_page: 0,
        }));
        assert!(issues.contains(&RelationshipIssue::Asymmetric {
            owner: "D".into(),
            partner: "A".into(),
            kind: LinkKind::Correspondence,
        }));
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn same_page_correspondence_is_flagged() {
        let set = ElementSet::from_elements(vec![
            post("A", 2).with_correspondents(stacked("B")),
            post("B", 2).with_correspondents(stacked("A")),
        ])
        .unwrap();

        let issues = set.validate_relationships();
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .all(|i| matches!(i, RelationshipIssue::NonAdjacentCorrespondent { .. })));
    }

    #[test]
    fn ambiguity_is_counted_per_page() {
        let set = ElementSet::from_elements(vec![
            post("L", 0).with_correspondents(vec![
                Correspondent::new("U1", ElementGeometry::point(0.0, 0.0)),
                Correspondent::new("U2", ElementGeometry::point(0.0, 0.0)),
            ]),
            post("M", 1).with_correspondents(vec![
                Correspondent::new("L", ElementGeometry::point(0.0, 0.0)),
                Correspondent::new("T", ElementGeometry::point(0.0, 0.0)),
            ]),
            post("U1", 1).with_correspondents(stacked("L")),
            post("U2", 1).with_correspondents(stacked("L")),
            post("T", 2).with_correspondents(stacked("M")),
        ])
        .unwrap();

        assert_eq!(set.ambiguous_correspondents(), vec!["L"]);
    }

    #[test]
    fn issues_render_readably() {
        let issue = RelationshipIssue::Asymmetric {
            owner: "FB1.1".into(),
            partner: "J1.1".into(),
            kind: LinkKind::Intersection,
        };
        assert_eq!(
            issue.to_string(),
            "FB1.1: intersection with J1.1 is not listed by J1.1"
        );
    }
}
