//! Indexed view of a discovered edge list, backed by petgraph.
//!
//! The discovery engine produces a flat `Vec<Edge>`. Serializers need stable
//! node numbering and adjacency lookups, which this module provides.

use super::{Edge, PackageId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// A directed dependency graph built from an edge list.
///
/// Nodes are added in first-appearance order over the edge list (for each
/// edge, `from` before `to`), so `NodeIndex::index()` doubles as a stable,
/// deterministic package number. Parallel edges are kept.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PackageId, ()>,

    /// Mapping from PackageId to graph NodeIndex.
    ///
    /// Invariant: every node in `graph` has exactly one entry here.
    node_map: HashMap<PackageId, NodeIndex>,
}

impl DependencyGraph {
    /// Build a graph from an edge list, preserving edge order.
    #[must_use]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Self::default();
        for edge in edges {
            let from = graph.ensure_node(&edge.from);
            let to = graph.ensure_node(&edge.to);
            graph.graph.add_edge(from, to, ());
        }
        graph
    }

    fn ensure_node(&mut self, id: &PackageId) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), index);
        index
    }

    /// Number of distinct packages.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// The first package seen, i.e. the `from` of the first edge.
    #[must_use]
    pub fn root(&self) -> Option<&PackageId> {
        self.graph.node_indices().next().map(|n| &self.graph[n])
    }

    /// Packages paired with their 1-based number, in numbering order.
    pub fn numbered_packages(&self) -> impl Iterator<Item = (usize, &PackageId)> {
        self.graph
            .node_indices()
            .map(|n| (n.index() + 1, &self.graph[n]))
    }

    /// Edges as `(from_number, to_number)` pairs, in original edge order.
    pub fn numbered_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index() + 1, e.target().index() + 1))
    }

    /// Direct dependencies of a package, in the order they were discovered.
    #[must_use]
    pub fn dependencies_of(&self, id: &str) -> Vec<&PackageId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };
        // petgraph walks outgoing edges newest-first.
        let mut deps: Vec<&PackageId> = self
            .graph
            .edges(node)
            .map(|e| &self.graph[e.target()])
            .collect();
        deps.reverse();
        deps
    }
}
