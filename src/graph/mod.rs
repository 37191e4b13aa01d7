//! Transportation graph and one-step reachability.
//!
//! The graph is a boolean [`PathMap`] over a contiguous node index space.
//! A `true` diagonal entry means an entity may wait in place for a step.
//! [`AdjacencyIndex`] derives the ordered successor lists used by trip
//! enumeration and random route construction. [`TimeMap`] weights edges
//! for scoring, and the generator functions build grid instances.

mod adjacency;
mod generator;
mod network;
mod time;
mod types;

pub use adjacency::{all_edges, incoming_edges, next_edges, next_nodes, AdjacencyIndex};
pub use generator::{manhattan_path_map, start_finish_nodes, start_nodes};
pub use network::Network;
pub use time::TimeMap;
pub use types::{Edge, NodeId, PathMap};
