//! The three layers of one solve, checked and scored together.

use crate::constraint::Checks;
use crate::error::ConfigError;
use crate::graph::{Edge, TimeMap};
use crate::state::{LinkState, RouteState, NO_VEHICLE};
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ride, drive and link layers of one carpooling solve.
///
/// Layers are public so a search driver can perturb them independently;
/// [`check_all`](Self::check_all) refreshes every violation count before
/// [`cost`](Self::cost) is read.
#[derive(Debug, Clone)]
pub struct Solve {
    pub ride: RouteState,
    pub drive: RouteState,
    pub link: LinkState,
    alpha: f64,
    violation_penalty: f64,
    time_map: Option<Arc<TimeMap>>,
}

impl Solve {
    pub fn new(
        ride: RouteState,
        drive: RouteState,
        link: LinkState,
        alpha: f64,
        violation_penalty: f64,
    ) -> Self {
        Self {
            ride,
            drive,
            link,
            alpha,
            violation_penalty,
            time_map: None,
        }
    }

    /// Scores travel time with per-edge times.
    pub fn with_time_map(mut self, time_map: Arc<TimeMap>) -> Self {
        self.time_map = Some(time_map);
        self
    }

    pub fn time_map(&self) -> Option<&TimeMap> {
        self.time_map.as_deref()
    }

    /// Random starting point: a candidate trip per passenger, random legal
    /// vehicle routes and random vehicle links.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> Result<(), ConfigError> {
        self.ride.tree_shuffle(rng)?;
        self.drive.shuffle(1.0, rng);
        self.link.shuffle(1.0, rng);
        Ok(())
    }

    /// Runs every named check on every layer. All layers are evaluated even
    /// when an earlier one fails.
    pub fn check_all(&mut self) -> bool {
        let ride_ok = self.ride.check_constraint(&Checks::all());
        let drive_ok = self.drive.check_constraint(&Checks::all());
        let link_ok = self
            .link
            .check_constraint(&self.ride, &self.drive, &Checks::all());
        ride_ok && drive_ok && link_ok
    }

    /// Sum of the stored violation counts of the three layers.
    pub fn violation_count(&self) -> usize {
        self.ride.violation_count() + self.drive.violation_count() + self.link.violation_count()
    }

    /// Passenger travel time, summed.
    ///
    /// Each passenger is charged for every step up to and including its last
    /// move. Without a time map a step costs `1.0`; with one it costs the
    /// time of the step's edge, waits included.
    pub fn travel_time(&self) -> f64 {
        (0..self.ride.dimensions().nb_entity)
            .map(|passenger| {
                let row = self.ride.assignment().row(passenger);
                let Some(last) = row
                    .iter()
                    .rposition(|cell| cell.is_some_and(|edge| !edge.is_wait()))
                else {
                    return 0.0;
                };
                match self.time_map.as_deref() {
                    Some(time_map) => row[..=last]
                        .iter()
                        .flatten()
                        .map(|&edge| time_map.edge_time(edge))
                        .sum::<f64>(),
                    None => (last + 1) as f64,
                }
            })
            .sum()
    }

    /// Distinct fleet vehicles that carry at least one passenger.
    pub fn vehicles_used(&self) -> usize {
        self.link
            .assignment()
            .rows()
            .flatten()
            .filter(|&&vehicle| vehicle != NO_VEHICLE && self.link.is_fleet_vehicle(vehicle))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Weighted objective, lower is better.
    ///
    /// `alpha` trades passenger travel time (`0.0`) against vehicles used
    /// (`1.0`); each stored violation adds the penalty.
    pub fn cost(&self) -> f64 {
        self.violation_penalty * self.violation_count() as f64
            + (1.0 - self.alpha) * self.travel_time()
            + self.alpha * self.vehicles_used() as f64
    }

    /// Ordered non-wait moves of every vehicle.
    pub fn vehicle_moves(&self) -> Vec<Vec<Edge>> {
        (0..self.drive.dimensions().nb_entity)
            .map(|vehicle| self.drive.moves(vehicle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Network, PathMap};
    use crate::state::{Anchor, FleetLimits};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two passengers 0 -> 3 riding vehicle 0 along 0 -> 1 -> 3.
    fn shared() -> Solve {
        let network = Arc::new(Network::new(PathMap::undirected(
            4,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
            true,
        )));
        let route = [Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)];
        let mut ride = RouteState::ride(
            3,
            Arc::clone(&network),
            vec![Anchor::passenger(0, 3), Anchor::passenger(0, 3)],
            FleetLimits {
                nb_vehicles: 1,
                capacity: 2,
            },
        )
        .unwrap();
        ride.set_route(0, &route);
        ride.set_route(1, &route);
        let mut drive = RouteState::drive(3, network, vec![Anchor::vehicle(0)]).unwrap();
        drive.set_route(0, &route);
        let mut link = LinkState::new(3, 4, 2, 1, 2);
        for passenger in 0..2 {
            link.set_vehicle(passenger, 0, 0);
            link.set_vehicle(passenger, 1, 0);
        }
        Solve::new(ride, drive, link, 0.5, 1000.0)
    }

    #[test]
    fn test_feasible_solve_cost() {
        let mut solve = shared();
        assert!(solve.check_all());
        assert_eq!(solve.violation_count(), 0);
        assert!((solve.travel_time() - 4.0).abs() < 1e-9);
        assert_eq!(solve.vehicles_used(), 1);
        assert!((solve.cost() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_time_map_weights_travel() {
        let rows = (0..4)
            .map(|i| (0..4).map(|j| if i == j { 0.0 } else { 2.5 }).collect())
            .collect();
        let time_map = Arc::new(TimeMap::from_rows(rows).unwrap());
        let mut solve = shared().with_time_map(time_map);
        assert!(solve.check_all());
        // two moves of 2.5 per passenger, trailing wait not charged
        assert!((solve.travel_time() - 10.0).abs() < 1e-9);
        assert!((solve.cost() - (0.5 * 10.0 + 0.5 * 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_violations_dominate_cost() {
        let mut solve = shared();
        solve.link.set_vehicle(0, 2, 0);
        assert!(!solve.check_all());
        assert!(solve.violation_count() >= 1);
        assert!(solve.cost() >= 1000.0);
    }

    #[test]
    fn test_check_all_evaluates_every_layer() {
        let mut solve = shared();
        solve.ride.set_cell(0, 2, None);
        solve.drive.set_cell(0, 2, None);
        assert!(!solve.check_all());
        assert!(solve.ride.violation_count() > 0);
        assert!(solve.drive.violation_count() > 0);
    }

    #[test]
    fn test_vehicle_moves_skip_waits() {
        let solve = shared();
        assert_eq!(
            solve.vehicle_moves(),
            vec![vec![Edge::new(0, 1), Edge::new(1, 3)]]
        );
    }

    #[test]
    fn test_initialize_installs_candidates() {
        let mut solve = shared();
        solve.ride.plan_candidates(None);
        let mut rng = StdRng::seed_from_u64(3);
        solve.initialize(&mut rng).unwrap();
        assert!(solve.ride.selected(0).is_some());
        assert!(solve.ride.check_start_finish());
        assert!(solve.ride.check_continuity());
        assert!(solve.drive.check_path_validity());
    }

    #[test]
    fn test_initialize_keeps_unplanned_rides() {
        let mut solve = shared();
        let before = solve.ride.assignment().clone();
        let mut rng = StdRng::seed_from_u64(3);
        solve.initialize(&mut rng).unwrap();
        assert_eq!(solve.ride.assignment(), &before);
        assert!(solve.ride.selected(0).is_none());
    }
}
