//! Constraint validation.
//!
//! Each named check is a pure predicate over the current cells. Checks
//! return data, never errors: [`ConstraintReport`] lists which named checks
//! failed, and `check_constraint` on each layer stores that count as the
//! layer's `violation_count` so that a search driver can score candidates.
//!
//! # Route checks
//!
//! [`RouteCheck`] covers anchoring, graph legality, continuity, one edge per
//! step and the fleet-size bound.
//!
//! # Link checks
//!
//! [`LinkCheck`] relates the link layer to the ride and drive layers:
//! passengers ride only while moving, vehicle counts follow from the number
//! of moving passengers, capacity holds, and riders share their vehicle's
//! edge.

mod link;
mod report;
mod route;

pub use report::{CheckKind, Checks, ConstraintReport, LinkCheck, RouteCheck};
