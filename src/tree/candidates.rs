//! Precomputed feasible trips of one entity.

use super::trip_tree::TripTree;
use crate::error::TreeBuildError;
use crate::graph::{Edge, NodeId};

/// One feasible trip: its tree address and its full-horizon route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Leaf address in the owning tree.
    pub address: Vec<usize>,
    /// Exactly `nb_steps` edges, padded with waits at the finish node.
    pub route: Vec<Edge>,
}

/// The trip tree of one entity together with every candidate trip.
///
/// Candidates are stored in depth-first order, which is also lexicographic
/// order of their addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    tree: TripTree,
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Builds the trip tree for `(start, finish)` with a budget of
    /// `nb_steps` and pads every leaf route to the horizon.
    pub fn plan(
        start: NodeId,
        finish: NodeId,
        nb_steps: usize,
        next_nodes: &[Vec<NodeId>],
    ) -> Result<Self, TreeBuildError> {
        let nb_nodes = next_nodes.len();
        for node in [start, finish] {
            if node >= nb_nodes {
                return Err(TreeBuildError::NodeOutOfRange { node, nb_nodes });
            }
        }
        let tree = TripTree::build(start, finish, nb_steps, next_nodes);
        if tree.is_empty() {
            return Err(TreeBuildError::NoRoute {
                start,
                finish,
                budget: nb_steps,
            });
        }
        Ok(Self::from_tree(tree, nb_steps))
    }

    /// Materializes the candidates of an already built tree.
    pub fn from_tree(tree: TripTree, nb_steps: usize) -> Self {
        let finish = tree.finish();
        let candidates = tree
            .all_addresses()
            .into_iter()
            .zip(tree.all_solutions())
            .map(|(address, nodes)| {
                let mut route: Vec<Edge> =
                    nodes.windows(2).map(|w| Edge::new(w[0], w[1])).collect();
                route.resize(nb_steps.max(route.len()), Edge::wait(finish));
                Candidate { address, route }
            })
            .collect();
        Self { tree, candidates }
    }

    pub fn tree(&self) -> &TripTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Index of the candidate with the given leaf address.
    pub fn position(&self, address: &[usize]) -> Option<usize> {
        self.candidates
            .binary_search_by(|candidate| candidate.address.as_slice().cmp(address))
            .ok()
    }
}
