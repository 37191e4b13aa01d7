//! Error taxonomy.
//!
//! Constraint violations are not errors: they are reported as data through
//! [`ConstraintReport`](crate::constraint::ConstraintReport) and the
//! `violation_count` of each state.

use crate::graph::NodeId;
use thiserror::Error;

/// Fatal problem-configuration errors.
///
/// Raised at construction time; a solve cannot proceed past one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A dimension that must be positive was zero.
    #[error("{name} must be positive")]
    InvalidDimension { name: &'static str },

    /// A node index is outside `[0, nb_nodes)`.
    #[error("{role} of entity {entity} is node {node}, outside 0..{nb_nodes}")]
    NodeOutOfRange {
        role: &'static str,
        entity: usize,
        node: NodeId,
        nb_nodes: usize,
    },

    /// The path map is not a square `nb_nodes x nb_nodes` matrix.
    #[error("path map must be {expected}x{expected}, found a row of length {found}")]
    PathMapShape { expected: usize, found: usize },

    /// The time map is not a square `nb_nodes x nb_nodes` matrix.
    #[error("time map must be {expected}x{expected}, found a row of length {found}")]
    TimeMapShape { expected: usize, found: usize },

    /// A travel time is negative or not finite.
    #[error("travel time from {from} to {to} must be finite and non-negative, got {time}")]
    InvalidTime { from: NodeId, to: NodeId, time: f64 },

    /// A grid graph was requested with a node count that is not a square.
    #[error("{nb_nodes} is not a square number of nodes")]
    NotSquare { nb_nodes: usize },

    /// Distinct start and finish nodes need at least two nodes.
    #[error("at least {required} nodes are needed, got {nb_nodes}")]
    TooFewNodes { nb_nodes: usize, required: usize },

    /// A per-entity input list does not match the configured count.
    #[error("expected {expected} {name}, got {found}")]
    EntityCountMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    /// Vehicle capacity or fleet size cannot carry any passenger.
    #[error("vehicle capacity {capacity} with {nb_vehicles} vehicles cannot carry {nb_passengers} passengers")]
    InvalidCapacity {
        capacity: usize,
        nb_vehicles: usize,
        nb_passengers: usize,
    },

    /// The objective balance is outside `[0, 1]`.
    #[error("alpha must be in [0, 1], got {0}")]
    InvalidAlpha(f64),

    /// The violation penalty is negative or not finite.
    #[error("violation penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f64),

    /// No trip reaches the finish node within the step budget.
    #[error("entity {entity} has no feasible trip within the step budget")]
    NoFeasibleTrip { entity: usize },

    /// Trip planning for one entity failed.
    #[error("trip planning failed for entity {entity}: {source}")]
    Planning {
        entity: usize,
        #[source]
        source: TreeBuildError,
    },
}

/// A tree address that does not fit the tree it is applied to.
///
/// This indicates a programming error in the caller: addresses produced by
/// [`TripTree::all_addresses`](crate::tree::TripTree::all_addresses) and
/// [`TripTree::neighbor`](crate::tree::TripTree::neighbor) never trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The tree holds no route at all.
    #[error("address applied to an empty tree")]
    EmptyTree,

    /// `depth` is larger than the address length.
    #[error("depth {depth} exceeds address length {len}")]
    DepthOutOfRange { depth: usize, len: usize },

    /// `level` is not a position of the address.
    #[error("level {level} is outside an address of length {len}")]
    LevelOutOfRange { level: usize, len: usize },

    /// The address selects a child that does not exist.
    #[error("child {index} requested at depth {depth}, branch has {available}")]
    ChildOutOfRange {
        depth: usize,
        index: usize,
        available: usize,
    },
}

/// Per-entity trip planning failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeBuildError {
    /// No node sequence reaches the finish within the budget.
    #[error("no route from {start} to {finish} within {budget} steps")]
    NoRoute {
        start: NodeId,
        finish: NodeId,
        budget: usize,
    },

    /// Start or finish is not a node of the graph.
    #[error("node {node} is outside 0..{nb_nodes}")]
    NodeOutOfRange { node: NodeId, nb_nodes: usize },

    /// Planning was abandoned through the cancellation token.
    #[error("trip planning cancelled")]
    Cancelled,
}
