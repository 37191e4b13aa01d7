//! Route-layer checks, shared by the ride and drive layers.
//!
//! The two layers differ only in anchoring: passengers pin both the start
//! and the finish, vehicles only the start. The fleet-size bound applies to
//! layers that carry [`FleetLimits`](crate::state::FleetLimits).

use super::report::{Checks, ConstraintReport, RouteCheck};
use crate::state::RouteState;

impl RouteState {
    /// Step 0 leaves the start of every entity. For entities with a finish,
    /// the last step ends there and no step ever leaves it.
    pub fn check_start_finish(&self) -> bool {
        let nb_steps = self.dimensions().nb_steps;
        self.anchors().iter().enumerate().all(|(entity, anchor)| {
            let starts = self.cell(entity, 0).is_some_and(|edge| edge.from == anchor.start);
            let Some(finish) = anchor.finish else {
                return starts;
            };
            let finishes = nb_steps
                .checked_sub(1)
                .and_then(|last| self.cell(entity, last))
                .is_some_and(|edge| edge.to == finish);
            let stays = self
                .assignment()
                .row(entity)
                .iter()
                .flatten()
                .all(|edge| edge.from != finish || edge.is_wait());
            starts && finishes && stays
        })
    }

    /// Every assigned cell is a legal move, waits included.
    pub fn check_path_validity(&self) -> bool {
        let network = self.network();
        self.assignment()
            .rows()
            .flatten()
            .flatten()
            .all(|&edge| network.allows(edge))
    }

    /// Each step starts at the node the previous step ended at.
    pub fn check_continuity(&self) -> bool {
        self.assignment().rows().all(|row| {
            row.windows(2).all(|pair| match (pair[0], pair[1]) {
                (Some(prev), Some(next)) => prev.to == next.from,
                _ => false,
            })
        })
    }

    /// Every step of every entity holds one edge.
    pub fn check_action_per_step(&self) -> bool {
        self.assignment().is_complete()
    }

    /// At every step, moving passengers fit in the fleet.
    ///
    /// Always satisfied for layers without fleet limits.
    pub fn check_fleet_size(&self) -> bool {
        let Some(fleet) = self.fleet() else {
            return true;
        };
        (0..self.dimensions().nb_steps)
            .all(|step| fleet.vehicles_needed(self.moving_count(step)) <= fleet.nb_vehicles)
    }

    fn run_check(&self, check: RouteCheck) -> bool {
        match check {
            RouteCheck::StartFinish => self.check_start_finish(),
            RouteCheck::PathValidity => self.check_path_validity(),
            RouteCheck::Continuity => self.check_continuity(),
            RouteCheck::ActionPerStep => self.check_action_per_step(),
            RouteCheck::FleetSize => self.check_fleet_size(),
        }
    }

    /// Evaluates the selected checks without touching the layer.
    pub fn evaluate(&self, checks: &Checks<RouteCheck>) -> ConstraintReport<RouteCheck> {
        let mut report = ConstraintReport::new();
        for check in checks.iter() {
            report.record(check, self.run_check(check));
        }
        report
    }

    /// Runs the selected checks and stores the number that failed as the
    /// layer's violation count. Returns whether all passed.
    pub fn check_constraint(&mut self, checks: &Checks<RouteCheck>) -> bool {
        let report = self.evaluate(checks);
        self.violation_count = report.violations();
        report.is_satisfied()
    }
}

#[cfg(test)]
mod tests {
    use crate::constraint::{Checks, RouteCheck};
    use crate::graph::{Edge, Network, PathMap};
    use crate::state::{Anchor, FleetLimits, RouteState};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn diamond() -> Arc<Network> {
        Arc::new(Network::new(PathMap::undirected(
            4,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
            true,
        )))
    }

    fn ride(passengers: Vec<Anchor>, nb_vehicles: usize, capacity: usize) -> RouteState {
        RouteState::ride(
            3,
            diamond(),
            passengers,
            FleetLimits {
                nb_vehicles,
                capacity,
            },
        )
        .unwrap()
    }

    fn feasible() -> RouteState {
        let mut state = ride(vec![Anchor::passenger(0, 3)], 1, 2);
        state.set_route(0, &[Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)]);
        state
    }

    #[test]
    fn test_feasible_route_passes_all() {
        let mut state = feasible();
        assert!(state.check_constraint(&Checks::all()));
        assert_eq!(state.violation_count(), 0);
    }

    #[test]
    fn test_wrong_start_counts_once() {
        let mut state = ride(vec![Anchor::passenger(1, 3)], 1, 2);
        state.set_route(0, &[Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)]);
        assert!(!state.check_constraint(&Checks::only(RouteCheck::StartFinish)));
        assert_eq!(state.violation_count(), 1);
    }

    #[test]
    fn test_wrong_finish() {
        let mut state = ride(vec![Anchor::passenger(0, 2)], 1, 2);
        state.set_route(0, &[Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)]);
        assert!(!state.check_start_finish());
    }

    #[test]
    fn test_leaving_finish_fails() {
        let mut state = ride(vec![Anchor::passenger(0, 1)], 1, 2);
        state.set_route(0, &[Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 1)]);
        assert!(state.check_path_validity());
        assert!(state.check_continuity());
        assert!(!state.check_start_finish());
    }

    #[test]
    fn test_illegal_edge() {
        let mut state = feasible();
        state.set_cell(0, 0, Some(Edge::new(0, 3)));
        assert!(!state.check_path_validity());
        // the edge change also breaks continuity with step 1
        let report = state.evaluate(&Checks::all());
        assert_eq!(
            report.failed(),
            &[RouteCheck::PathValidity, RouteCheck::Continuity]
        );
    }

    #[test]
    fn test_discontinuous() {
        let mut state = feasible();
        state.set_cell(0, 1, Some(Edge::new(2, 3)));
        assert!(state.check_path_validity());
        assert!(!state.check_continuity());
    }

    #[test]
    fn test_unassigned_cells() {
        let mut state = feasible();
        state.set_cell(0, 1, None);
        assert!(!state.check_action_per_step());
        assert!(!state.check_continuity());
        assert!(state.check_path_validity());
    }

    #[test]
    fn test_fleet_size() {
        let mut state = ride(
            vec![
                Anchor::passenger(0, 3),
                Anchor::passenger(0, 3),
                Anchor::passenger(1, 3),
            ],
            1,
            2,
        );
        let route = [Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)];
        state.set_route(0, &route);
        state.set_route(1, &route);
        state.set_route(2, &[Edge::wait(1), Edge::new(1, 3), Edge::wait(3)]);
        // step 1: three movers need two vehicles of capacity 2
        assert!(!state.check_fleet_size());

        state.set_route(2, &[Edge::new(1, 3), Edge::wait(3), Edge::wait(3)]);
        // step 0: three movers again
        assert!(!state.check_fleet_size());

        state.set_route(2, &[Edge::wait(1), Edge::wait(1), Edge::new(1, 3)]);
        assert!(state.check_fleet_size());
    }

    #[test]
    fn test_drive_anchors_start_only() {
        let mut state =
            RouteState::drive(3, diamond(), vec![Anchor::vehicle(2)]).unwrap();
        state.set_route(0, &[Edge::new(2, 1), Edge::new(1, 0), Edge::wait(0)]);
        assert!(state.check_constraint(&Checks::all()));
        state.set_cell(0, 0, Some(Edge::new(1, 1)));
        assert!(!state.check_start_finish());
    }

    #[test]
    fn test_check_constraint_idempotent() {
        let mut state = feasible();
        state.set_cell(0, 1, Some(Edge::new(3, 0)));
        let first = state.check_constraint(&Checks::all());
        let count = state.violation_count();
        let second = state.check_constraint(&Checks::all());
        assert_eq!(first, second);
        assert_eq!(count, state.violation_count());
        assert!(count > 0);
    }

    #[test]
    fn test_check_constraint_resets_count() {
        let mut state = feasible();
        state.set_cell(0, 0, Some(Edge::new(0, 3)));
        assert!(!state.check_constraint(&Checks::all()));
        assert!(state.violation_count() > 0);
        assert!(state.check_constraint(&Checks::none()));
        assert_eq!(state.violation_count(), 0);
    }

    #[test]
    fn test_tree_shuffle_passes_route_checks() {
        let mut state = ride(
            vec![Anchor::passenger(0, 3), Anchor::passenger(2, 1)],
            2,
            1,
        );
        state.plan_candidates(None);
        let mut rng = StdRng::seed_from_u64(17);
        let checks = Checks::all().without(RouteCheck::FleetSize);
        for _ in 0..25 {
            state.tree_shuffle(&mut rng).unwrap();
            assert!(state.check_constraint(&checks));
        }
    }
}
