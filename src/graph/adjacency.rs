//! One-step reachability derived from a [`PathMap`].
//!
//! All lists are in ascending node order. Trip enumeration iterates them
//! in that order, so the order fixes the address layout of every trip tree.

use super::types::{Edge, NodeId, PathMap};

/// Nodes reachable in one step from each node, ascending.
///
/// Includes the node itself when waiting there is legal.
pub fn next_nodes(path_map: &PathMap) -> Vec<Vec<NodeId>> {
    (0..path_map.nb_nodes())
        .map(|node| {
            path_map
                .row(node)
                .iter()
                .enumerate()
                .filter_map(|(next, &legal)| legal.then_some(next))
                .collect()
        })
        .collect()
}

/// Same enumeration as [`next_nodes`], materialized as edges.
pub fn next_edges(path_map: &PathMap) -> Vec<Vec<Edge>> {
    next_nodes(path_map)
        .into_iter()
        .enumerate()
        .map(|(node, nexts)| nexts.into_iter().map(|next| Edge::new(node, next)).collect())
        .collect()
}

/// Edges ending at each node, ordered by ascending origin.
pub fn incoming_edges(path_map: &PathMap) -> Vec<Vec<Edge>> {
    let n = path_map.nb_nodes();
    (0..n)
        .map(|node| {
            (0..n)
                .filter(|&prev| path_map.allows(prev, node))
                .map(|prev| Edge::new(prev, node))
                .collect()
        })
        .collect()
}

/// Every legal edge, in row-major order.
pub fn all_edges(path_map: &PathMap) -> Vec<Edge> {
    next_edges(path_map).into_iter().flatten().collect()
}

/// Precomputed adjacency lists for one graph.
///
/// Built once per solve and shared read-only by every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    next_nodes: Vec<Vec<NodeId>>,
    next_edges: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
}

impl AdjacencyIndex {
    pub fn new(path_map: &PathMap) -> Self {
        Self {
            next_nodes: next_nodes(path_map),
            next_edges: next_edges(path_map),
            incoming: incoming_edges(path_map),
        }
    }

    pub fn nb_nodes(&self) -> usize {
        self.next_nodes.len()
    }

    /// Successors of `node`.
    pub fn next_nodes(&self, node: NodeId) -> &[NodeId] {
        self.next_nodes.get(node).map_or(&[], Vec::as_slice)
    }

    /// Outgoing edges of `node`.
    pub fn next_edges(&self, node: NodeId) -> &[Edge] {
        self.next_edges.get(node).map_or(&[], Vec::as_slice)
    }

    /// Incoming edges of `node`.
    pub fn incoming_edges(&self, node: NodeId) -> &[Edge] {
        self.incoming.get(node).map_or(&[], Vec::as_slice)
    }

    /// The full successor table.
    pub fn successors(&self) -> &[Vec<NodeId>] {
        &self.next_nodes
    }
}
