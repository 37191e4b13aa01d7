//! State and constraint layer for vehicle carpooling search.
//!
//! Passengers travel from a start node to a finish node over a discrete time
//! horizon, riding vehicles that share their edge at each step. This crate
//! provides the pieces a local-search driver needs:
//!
//! - **Graph**: adjacency lookups over a boolean path map, waits included.
//! - **Trip trees**: every bounded-length path from a start to a finish,
//!   enumerated by address, with a neighbor move that always stays on a
//!   trip reaching the finish.
//! - **Assignment states**: the ride (passenger routes), drive (vehicle
//!   routes) and link (passenger-to-vehicle) layers, with random shuffles
//!   and perturbation moves.
//! - **Constraints**: named checks over each layer, reported as data and
//!   counted as violations for scoring.
//! - **Problems**: validated inputs and a weighted objective over a solve.
//!
//! The search loop itself is left to the caller.
//!
//! # Features
//!
//! - `parallel` (default): trip trees are planned concurrently with rayon.
//! - `serde`: serialization of configurations, edges and path maps.

pub mod constraint;
pub mod error;
pub mod graph;
pub mod problem;
pub mod state;
pub mod tree;

pub use error::{AddressError, ConfigError, TreeBuildError};
