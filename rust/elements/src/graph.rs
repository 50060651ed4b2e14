// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connectivity graph over discovered relationships.
//!
//! Builds an undirected graph from an [`ElementSet`] where:
//! - **Nodes** = elements, indexed in set insertion order
//! - **Edges** = intersection links (same page) and correspondence links
//!   (adjacent pages)
//!
//! This is the structure downstream model building reads: "what does this
//! beam bear on?", "which column segments stack into one column?", "which
//! elements are not connected to anything?".

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::ElementSet;
use crate::keys::{ElementKey, LinkKind};

/// A node in the connectivity graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: ElementKey,
    pub tag: String,
    pub page: u32,
}

/// An undirected edge in the connectivity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    /// Lower node index.
    pub source: usize,
    /// Higher node index.
    pub target: usize,
    pub kind: LinkKind,
}

/// Element connectivity graph.
#[derive(Debug, Default)]
pub struct ConnectivityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Adjacency list: node index → list of (neighbor index, edge index).
    adjacency: Vec<Vec<(usize, usize)>>,
    tag_to_node: FxHashMap<String, usize>,
}

impl ConnectivityGraph {
    /// Builds the graph from the relationship lists of `set`.
    ///
    /// A link listed from both ends becomes one edge. Links to tags outside
    /// the set and self links are ignored; relationship validation reports
    /// those.
    pub fn from_elements(set: &ElementSet) -> Self {
        let mut graph = Self::default();
        for (key, element) in set.iter() {
            graph.add_node(key, element.tag(), element.page());
        }

        let mut seen: FxHashSet<(usize, usize, LinkKind)> = FxHashSet::default();
        for (source, element) in set.elements().enumerate() {
            let links = element
                .intersection_tags()
                .map(|t| (t, LinkKind::Intersection))
                .chain(element.correspondent_tags().map(|t| (t, LinkKind::Correspondence)));

            for (partner, kind) in links {
                let Some(target) = graph.node_index(partner) else { continue };
                if target == source {
                    continue;
                }
                let (lo, hi) = (source.min(target), source.max(target));
                if seen.insert((lo, hi, kind)) {
                    graph.add_edge(lo, hi, kind);
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built connectivity graph"
        );
        graph
    }

    fn add_node(&mut self, key: ElementKey, tag: &str, page: u32) -> usize {
        let idx = self.nodes.len();
        self.tag_to_node.insert(tag.to_string(), idx);
        self.nodes.push(GraphNode {
            key,
            tag: tag.to_string(),
            page,
        });
        self.adjacency.push(Vec::new());
        idx
    }

    fn add_edge(&mut self, source: usize, target: usize, kind: LinkKind) -> usize {
        let idx = self.edges.len();
        self.edges.push(GraphEdge { source, target, kind });
        self.adjacency[source].push((target, idx));
        self.adjacency[target].push((source, idx));
        idx
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node index for an element tag.
    pub fn node_index(&self, tag: &str) -> Option<usize> {
        self.tag_to_node.get(tag).copied()
    }

    /// Returns the tag of a node.
    pub fn tag(&self, node: usize) -> &str {
        &self.nodes[node].tag
    }

    /// Returns the neighbors of a node as (neighbor_index, link kind) pairs.
    pub fn neighbors(&self, node: usize) -> Vec<(usize, LinkKind)> {
        self.adjacency[node]
            .iter()
            .map(|&(neighbor, edge_idx)| (neighbor, self.edges[edge_idx].kind))
            .collect()
    }

    /// Returns the degree (number of connections) of a node.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Returns isolated nodes (degree 0).
    pub fn isolated_nodes(&self) -> Vec<usize> {
        (0..self.node_count()).filter(|&n| self.degree(n) == 0).collect()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// BFS shortest path (hop count) between two tagged elements.
    ///
    /// Returns node indices from `from` to `to` inclusive, or `None` if either
    /// tag is unknown or no path exists.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<usize>> {
        let source = self.node_index(from)?;
        let target = self.node_index(to)?;

        let n = self.node_count();
        let mut visited = vec![false; n];
        let mut prev = vec![None; n];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            if node == target {
                break;
            }
            for &(neighbor, _) in &self.adjacency[node] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    prev[neighbor] = Some(node);
                    queue.push_back(neighbor);
                }
            }
        }

        if !visited[target] {
            return None;
        }

        let mut path = Vec::new();
        let mut current = target;
        while let Some(p) = prev[current] {
            path.push(current);
            current = p;
        }
        path.push(source);
        path.reverse();
        Some(path)
    }

    /// Returns connected components as lists of node indices.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.node_count()];
        let mut components = Vec::new();
        for start in 0..self.node_count() {
            if !visited[start] {
                components.push(self.reach(start, None, &mut visited));
            }
        }
        components
    }

    /// All elements reachable from `tag` through correspondence links only,
    /// ordered by page. This is the cross-page identity chain of one physical
    /// element (a column drawn on every floor, for instance).
    pub fn vertical_stack(&self, tag: &str) -> Vec<usize> {
        let Some(start) = self.node_index(tag) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.node_count()];
        let mut stack = self.reach(start, Some(LinkKind::Correspondence), &mut visited);
        stack.sort_by_key(|&n| (self.nodes[n].page, n));
        stack
    }

    /// BFS from `start`, optionally following only one kind of link.
    fn reach(&self, start: usize, kind: Option<LinkKind>, visited: &mut [bool]) -> Vec<usize> {
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &(neighbor, edge_idx) in &self.adjacency[node] {
                if kind.is_some_and(|k| self.edges[edge_idx].kind != k) {
                    continue;
                }
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Correspondent, Element, Intersection};
    use crate::geometry::ElementGeometry;
    use geo::Point;

    fn node(tag: &str, page: u32, touches: &[&str], stacks_on: &[&str]) -> Element {
        Element::new(tag, "Member", page, ElementGeometry::point(0.0, 0.0))
            .with_intersections(
                touches
                    .iter()
                    .map(|t| Intersection::new(*t, Point::new(0.0, 0.0)))
                    .collect(),
            )
            .with_correspondents(
                stacks_on
                    .iter()
                    .map(|t| Correspondent::new(*t, ElementGeometry::point(0.0, 0.0)))
                    .collect(),
            )
    }

    /// Two floors: beam FB0 rests on column C0, C0 continues as C1 above,
    /// FB1 rests on C1. W is an orphan wall on floor 1.
    fn make_building() -> ConnectivityGraph {
        let set = ElementSet::from_elements(vec![
            node("FB0", 0, &["C0"], &[]),
            node("C0", 0, &["FB0"], &["C1"]),
            node("C1", 1, &["FB1"], &["C0"]),
            node("FB1", 1, &["C1"], &[]),
            node("W", 1, &[], &[]),
        ])
        .unwrap();
        ConnectivityGraph::from_elements(&set)
    }

    #[test]
    fn graph_basic_properties() {
        let g = make_building();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.node_index("C1"), Some(2));
        assert_eq!(g.tag(3), "FB1");
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn links_listed_from_both_ends_are_one_edge() {
        let g = make_building();
        let c0 = g.node_index("C0").unwrap();
        let mut n = g.neighbors(c0);
        n.sort();
        assert_eq!(
            n,
            vec![(0, LinkKind::Intersection), (2, LinkKind::Correspondence)]
        );
    }

    #[test]
    fn one_sided_and_dangling_links() {
        let set = ElementSet::from_elements(vec![
            node("A", 0, &["B", "ghost", "A"], &[]),
            node("B", 0, &[], &[]),
        ])
        .unwrap();
        let g = ConnectivityGraph::from_elements(&set);
        assert_eq!(g.edge_count(), 1);
        assert!(g.isolated_nodes().is_empty());
    }

    #[test]
    fn isolated_nodes() {
        let g = make_building();
        assert_eq!(g.isolated_nodes(), vec![4]);
    }

    #[test]
    fn path_crosses_floors() {
        let g = make_building();
        let path = g.shortest_path("FB0", "FB1").unwrap();
        let tags: Vec<&str> = path.iter().map(|&n| g.tag(n)).collect();
        assert_eq!(tags, vec!["FB0", "C0", "C1", "FB1"]);

        assert!(g.shortest_path("FB0", "W").is_none());
        assert!(g.shortest_path("FB0", "nope").is_none());
        assert_eq!(g.shortest_path("W", "W"), Some(vec![4]));
    }

    #[test]
    fn connected_components_multiple() {
        let g = make_building();
        let comps = g.connected_components();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].len(), 4);
        assert_eq!(comps[1], vec![4]);
    }

    #[test]
    fn vertical_stack_follows_correspondence_only() {
        let g = make_building();
        let stack: Vec<&str> = g.vertical_stack("C1").iter().map(|&n| g.tag(n)).collect();
        assert_eq!(stack, vec!["C0", "C1"]);

        assert_eq!(g.vertical_stack("FB0"), vec![0]);
        assert!(g.vertical_stack("missing").is_empty());
    }

    #[test]
    fn empty_set_gives_empty_graph() {
        let g = ConnectivityGraph::from_elements(&ElementSet::new());
        assert_eq!(g.node_count(), 0);
        assert!(g.connected_components().is_empty());
    }
}
