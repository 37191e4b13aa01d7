//! A path map bundled with its adjacency lists.

use super::adjacency::AdjacencyIndex;
use super::types::{Edge, NodeId, PathMap};

/// Read-only graph shared by every layer of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    path_map: PathMap,
    adjacency: AdjacencyIndex,
}

impl Network {
    pub fn new(path_map: PathMap) -> Self {
        let adjacency = AdjacencyIndex::new(&path_map);
        Self {
            path_map,
            adjacency,
        }
    }

    pub fn nb_nodes(&self) -> usize {
        self.path_map.nb_nodes()
    }

    pub fn path_map(&self) -> &PathMap {
        &self.path_map
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn allows(&self, edge: Edge) -> bool {
        self.path_map.allows_edge(edge)
    }

    pub fn next_edges(&self, node: NodeId) -> &[Edge] {
        self.adjacency.next_edges(node)
    }

    pub fn incoming_edges(&self, node: NodeId) -> &[Edge] {
        self.adjacency.incoming_edges(node)
    }
}
