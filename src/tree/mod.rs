//! Trip trees.
//!
//! A trip tree holds every node sequence that leads an entity from its
//! start node to its finish node within a step budget. Branches that cannot
//! reach the finish in time are pruned while the tree is built, so every
//! leaf of a stored tree is the finish node.
//!
//! A *tree address* is a sequence of 0-based child indices walked from the
//! root. Addresses of leaves, enumerated depth-first, are the candidate
//! trips of an entity; [`CandidateSet`] pads each to the planning horizon.
//!
//! # Planning
//!
//! [`plan_trips`] builds one candidate set per entity, concurrently when
//! the `parallel` feature is enabled. Each entity succeeds or fails on its
//! own.

mod candidates;
mod planner;
mod trip_tree;

pub use candidates::{Candidate, CandidateSet};
pub use planner::{plan_trips, TripRequest};
pub use trip_tree::{Branch, TripTree};
