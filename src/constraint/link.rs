//! Link-layer checks against the ride and drive layers.

use super::report::{Checks, ConstraintReport, LinkCheck};
use crate::graph::Edge;
use crate::state::{LinkState, RouteState, VehicleId, NO_VEHICLE};
use std::collections::{BTreeMap, BTreeSet};

impl LinkState {
    /// Riders per vehicle id at `step`, sentinel excluded.
    fn riders_at(&self, step: usize) -> BTreeMap<VehicleId, usize> {
        let mut riders = BTreeMap::new();
        for vehicle in self.assignment().column(step) {
            if vehicle != NO_VEHICLE {
                *riders.entry(vehicle).or_insert(0) += 1;
            }
        }
        riders
    }

    /// A passenger holds a fleet vehicle while it moves in `ride`, and holds
    /// no vehicle while it waits or is unassigned.
    pub fn check_ride_link(&self, ride: &RouteState) -> bool {
        let dims = self.dimensions();
        (0..dims.nb_entity).all(|passenger| {
            (0..dims.nb_steps).all(|step| {
                let vehicle = self.vehicle(passenger, step);
                if ride.is_moving(passenger, step) {
                    self.is_fleet_vehicle(vehicle)
                } else {
                    vehicle == NO_VEHICLE
                }
            })
        })
    }

    /// At every step, the number of vehicles in use equals
    /// `ceil(moving passengers / capacity)` taken from `ride`.
    pub fn check_vehicle_count_consistency(&self, ride: &RouteState) -> bool {
        let capacity = self.capacity().max(1);
        (0..self.dimensions().nb_steps).all(|step| {
            let in_use = self.riders_at(step).len();
            in_use == ride.moving_count(step).div_ceil(capacity)
        })
    }

    /// No vehicle is held by more than `capacity` passengers at a step.
    pub fn check_vehicle_capacity(&self) -> bool {
        (0..self.dimensions().nb_steps).all(|step| {
            self.riders_at(step)
                .values()
                .all(|&riders| riders <= self.capacity())
        })
    }

    /// At every step, each vehicle and the passengers linked to it traverse
    /// at most one distinct edge.
    pub fn check_single_edge_per_vehicle(&self, ride: &RouteState, drive: &RouteState) -> bool {
        let dims = self.dimensions();
        (0..dims.nb_steps).all(|step| {
            let mut edges: BTreeMap<VehicleId, BTreeSet<Edge>> = BTreeMap::new();
            for vehicle in 0..drive.dimensions().nb_entity {
                if let Some(edge) = drive.cell(vehicle, step) {
                    edges.entry(vehicle as VehicleId).or_default().insert(edge);
                }
            }
            for passenger in 0..dims.nb_entity {
                let vehicle = self.vehicle(passenger, step);
                if vehicle == NO_VEHICLE {
                    continue;
                }
                if let Some(edge) = ride.cell(passenger, step) {
                    edges.entry(vehicle).or_default().insert(edge);
                }
            }
            edges.values().all(|set| set.len() <= 1)
        })
    }

    fn run_check(&self, check: LinkCheck, ride: &RouteState, drive: &RouteState) -> bool {
        match check {
            LinkCheck::RideLink => self.check_ride_link(ride),
            LinkCheck::VehicleCountConsistency => self.check_vehicle_count_consistency(ride),
            LinkCheck::VehicleCapacity => self.check_vehicle_capacity(),
            LinkCheck::SingleEdgePerVehicle => self.check_single_edge_per_vehicle(ride, drive),
        }
    }

    /// Evaluates the selected checks without touching the layer.
    pub fn evaluate(
        &self,
        ride: &RouteState,
        drive: &RouteState,
        checks: &Checks<LinkCheck>,
    ) -> ConstraintReport<LinkCheck> {
        let mut report = ConstraintReport::new();
        for check in checks.iter() {
            report.record(check, self.run_check(check, ride, drive));
        }
        report
    }

    /// Runs the selected checks, stores the number that failed as the
    /// layer's violation count and returns whether all passed.
    pub fn check_constraint(
        &mut self,
        ride: &RouteState,
        drive: &RouteState,
        checks: &Checks<LinkCheck>,
    ) -> bool {
        let report = self.evaluate(ride, drive, checks);
        self.violation_count = report.violations();
        report.is_satisfied()
    }
}

#[cfg(test)]
mod tests {
    use crate::constraint::{Checks, LinkCheck};
    use crate::graph::{Edge, Network, PathMap};
    use crate::state::{Anchor, FleetLimits, LinkState, RouteState, NO_VEHICLE};
    use std::sync::Arc;

    fn diamond() -> Arc<Network> {
        Arc::new(Network::new(PathMap::undirected(
            4,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
            true,
        )))
    }

    /// Two passengers 0 -> 3 sharing vehicle 0, which drives 0 -> 1 -> 3.
    fn shared() -> (RouteState, RouteState, LinkState) {
        let network = diamond();
        let mut ride = RouteState::ride(
            3,
            Arc::clone(&network),
            vec![Anchor::passenger(0, 3), Anchor::passenger(0, 3)],
            FleetLimits {
                nb_vehicles: 2,
                capacity: 2,
            },
        )
        .unwrap();
        let route = [Edge::new(0, 1), Edge::new(1, 3), Edge::wait(3)];
        ride.set_route(0, &route);
        ride.set_route(1, &route);

        let mut drive = RouteState::drive(
            3,
            network,
            vec![Anchor::vehicle(0), Anchor::vehicle(2)],
        )
        .unwrap();
        drive.set_route(0, &route);
        drive.set_route(1, &[Edge::wait(2); 3]);

        let mut link = LinkState::new(3, 4, 2, 2, 2);
        for passenger in 0..2 {
            link.set_vehicle(passenger, 0, 0);
            link.set_vehicle(passenger, 1, 0);
        }
        (ride, drive, link)
    }

    #[test]
    fn test_shared_ride_is_consistent() {
        let (ride, drive, mut link) = shared();
        assert!(link.check_constraint(&ride, &drive, &Checks::all()));
        assert_eq!(link.violation_count(), 0);
    }

    #[test]
    fn test_linked_while_waiting() {
        let (ride, drive, mut link) = shared();
        link.set_vehicle(0, 2, 0);
        assert!(!link.check_ride_link(&ride));
    }

    #[test]
    fn test_moving_without_vehicle() {
        let (ride, _, mut link) = shared();
        link.set_vehicle(1, 1, NO_VEHICLE);
        assert!(!link.check_ride_link(&ride));
    }

    #[test]
    fn test_vehicle_outside_fleet() {
        let (ride, _, mut link) = shared();
        link.set_vehicle(1, 1, 5);
        assert!(!link.check_ride_link(&ride));
    }

    #[test]
    fn test_count_consistency_extra_vehicle() {
        let (ride, drive, mut link) = shared();
        // two movers of capacity 2 need one vehicle, not two
        link.set_vehicle(1, 0, 1);
        assert!(!link.check_vehicle_count_consistency(&ride));
        let report = link.evaluate(&ride, &drive, &Checks::all());
        assert!(report.failed().contains(&LinkCheck::VehicleCountConsistency));
    }

    #[test]
    fn test_capacity_exceeded() {
        let (ride, drive, _) = shared();
        let mut link = LinkState::new(3, 4, 2, 2, 1);
        for passenger in 0..2 {
            link.set_vehicle(passenger, 0, 0);
        }
        assert!(!link.check_vehicle_capacity());
        assert!(!link.check_constraint(&ride, &drive, &Checks::only(LinkCheck::VehicleCapacity)));
        assert_eq!(link.violation_count(), 1);
    }

    #[test]
    fn test_shared_vehicle_on_different_edges() {
        let (mut ride, drive, link) = shared();
        ride.set_route(1, &[Edge::new(0, 2), Edge::new(2, 3), Edge::wait(3)]);
        assert!(!link.check_single_edge_per_vehicle(&ride, &drive));
    }

    #[test]
    fn test_rider_off_vehicle_edge() {
        let (ride, mut drive, link) = shared();
        drive.set_route(0, &[Edge::new(0, 2), Edge::new(2, 3), Edge::wait(3)]);
        assert!(!link.check_single_edge_per_vehicle(&ride, &drive));
    }

    #[test]
    fn test_link_check_idempotent() {
        let (ride, drive, mut link) = shared();
        link.set_vehicle(0, 2, 1);
        let first = link.check_constraint(&ride, &drive, &Checks::all());
        let count = link.violation_count();
        assert_eq!(first, link.check_constraint(&ride, &drive, &Checks::all()));
        assert_eq!(count, link.violation_count());
    }
}
