//! Mutable candidate assignments.
//!
//! An assignment is a fixed `[entity][step]` table. Three layers describe a
//! full candidate solution:
//!
//! - the ride layer ([`RouteState`] of kind [`RouteKind::Ride`]): one edge
//!   per passenger per step,
//! - the drive layer ([`RouteState`] of kind [`RouteKind::Drive`]): one edge
//!   per vehicle per step,
//! - the link layer ([`LinkState`]): the vehicle each passenger rides.
//!
//! Every stochastic operation takes an explicit random generator so that
//! search runs are reproducible from a seed.

mod link;
mod matrix;
mod route;

pub use link::LinkState;
pub use matrix::{Assignment, Cell, Dimensions, RouteCell, VehicleId, NO_VEHICLE};
pub use route::{Anchor, CandidateSlot, FleetLimits, RouteKind, RouteState};

use rand::Rng;

/// Bernoulli draw. Probabilities above 1 always succeed; negative and NaN
/// probabilities never do.
pub(crate) fn chance<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}

/// Capabilities shared by every layer that an external search driver
/// mutates and scores.
pub trait Validatable: Clone + Send {
    fn dimensions(&self) -> Dimensions;

    /// Randomly redraws cells with probability `rate`.
    fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R);

    /// Named checks that failed during the last full check.
    fn violation_count(&self) -> usize;
}

impl Validatable for RouteState {
    fn dimensions(&self) -> Dimensions {
        RouteState::dimensions(self)
    }

    fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        RouteState::shuffle(self, rate, rng)
    }

    fn violation_count(&self) -> usize {
        RouteState::violation_count(self)
    }
}

impl Validatable for LinkState {
    fn dimensions(&self) -> Dimensions {
        LinkState::dimensions(self)
    }

    fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        LinkState::shuffle(self, rate, rng)
    }

    fn violation_count(&self) -> usize {
        LinkState::violation_count(self)
    }
}

/// Either kind of layer.
#[derive(Debug, Clone)]
pub enum AssignmentState {
    Route(RouteState),
    Link(LinkState),
}

impl AssignmentState {
    pub fn as_route(&self) -> Option<&RouteState> {
        match self {
            AssignmentState::Route(state) => Some(state),
            AssignmentState::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkState> {
        match self {
            AssignmentState::Link(state) => Some(state),
            AssignmentState::Route(_) => None,
        }
    }
}

impl Validatable for AssignmentState {
    fn dimensions(&self) -> Dimensions {
        match self {
            AssignmentState::Route(state) => state.dimensions(),
            AssignmentState::Link(state) => state.dimensions(),
        }
    }

    fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        match self {
            AssignmentState::Route(state) => state.shuffle(rate, rng),
            AssignmentState::Link(state) => state.shuffle(rate, rng),
        }
    }

    fn violation_count(&self) -> usize {
        match self {
            AssignmentState::Route(state) => state.violation_count(),
            AssignmentState::Link(state) => state.violation_count(),
        }
    }
}

impl From<RouteState> for AssignmentState {
    fn from(state: RouteState) -> Self {
        AssignmentState::Route(state)
    }
}

impl From<LinkState> for AssignmentState {
    fn from(state: LinkState) -> Self {
        AssignmentState::Link(state)
    }
}
