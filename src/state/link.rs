//! Link layer: which vehicle each passenger rides at each step.

use super::chance;
use super::matrix::{Assignment, Dimensions, VehicleId, NO_VEHICLE};
use rand::Rng;

/// Passenger-to-vehicle assignment per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    assignment: Assignment<VehicleId>,
    nb_vehicles: usize,
    capacity: usize,
    pub(crate) violation_count: usize,
}

impl LinkState {
    pub fn new(
        nb_steps: usize,
        nb_nodes: usize,
        nb_passengers: usize,
        nb_vehicles: usize,
        capacity: usize,
    ) -> Self {
        Self {
            assignment: Assignment::new(Dimensions {
                nb_steps,
                nb_nodes,
                nb_entity: nb_passengers,
            }),
            nb_vehicles,
            capacity,
            violation_count: 0,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.assignment.dimensions()
    }

    pub fn nb_vehicles(&self) -> usize {
        self.nb_vehicles
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn assignment(&self) -> &Assignment<VehicleId> {
        &self.assignment
    }

    pub fn violation_count(&self) -> usize {
        self.violation_count
    }

    /// Vehicle held by `passenger` at `step`; [`NO_VEHICLE`] when none or
    /// out of range.
    pub fn vehicle(&self, passenger: usize, step: usize) -> VehicleId {
        self.assignment.get(passenger, step).unwrap_or(NO_VEHICLE)
    }

    /// Whether `vehicle` names a vehicle of the fleet.
    pub fn is_fleet_vehicle(&self, vehicle: VehicleId) -> bool {
        usize::try_from(vehicle).is_ok_and(|v| v < self.nb_vehicles)
    }

    pub fn set_vehicle(&mut self, passenger: usize, step: usize, vehicle: VehicleId) {
        self.assignment.set(passenger, step, vehicle);
    }

    /// Redraws each cell with probability `rate` as a uniformly random
    /// vehicle of the fleet.
    pub fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        if self.nb_vehicles == 0 {
            return;
        }
        let dims = self.dimensions();
        for passenger in 0..dims.nb_entity {
            for step in 0..dims.nb_steps {
                if chance(rng, rate) {
                    let vehicle = rng.random_range(0..self.nb_vehicles) as VehicleId;
                    self.assignment.set(passenger, step, vehicle);
                }
            }
        }
    }

    /// Raw perturbation returning a new layer.
    ///
    /// Each cell is picked with probability `rate` and shifted by
    /// `temperature` up or down without clamping. Validity is left to the
    /// link checks.
    pub fn get_neighbor<R: Rng>(&self, rate: f64, temperature: VehicleId, rng: &mut R) -> LinkState {
        let mut neighbor = self.clone();
        for row in neighbor.assignment.rows_mut() {
            for cell in row.iter_mut() {
                if chance(rng, rate) {
                    let delta = if rng.random_bool(0.5) {
                        temperature
                    } else {
                        -temperature
                    };
                    *cell = cell.saturating_add(delta);
                }
            }
        }
        neighbor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_unlinked() {
        let link = LinkState::new(3, 4, 2, 2, 2);
        assert!(link.assignment().rows().flatten().all(|&v| v == NO_VEHICLE));
        assert_eq!(link.vehicle(5, 0), NO_VEHICLE);
    }

    #[test]
    fn test_shuffle_draws_fleet_vehicles() {
        let mut link = LinkState::new(4, 4, 3, 2, 2);
        let mut rng = StdRng::seed_from_u64(1);
        link.shuffle(1.0, &mut rng);
        assert!(link
            .assignment()
            .rows()
            .flatten()
            .all(|&v| link.is_fleet_vehicle(v)));
    }

    #[test]
    fn test_shuffle_without_fleet_is_noop() {
        let mut link = LinkState::new(2, 4, 2, 0, 2);
        let mut rng = StdRng::seed_from_u64(1);
        link.shuffle(1.0, &mut rng);
        assert_eq!(link, LinkState::new(2, 4, 2, 0, 2));
    }

    #[test]
    fn test_get_neighbor_unclamped() {
        let link = LinkState::new(3, 4, 2, 2, 2);
        let mut rng = StdRng::seed_from_u64(4);
        let neighbor = link.get_neighbor(1.0, 3, &mut rng);
        assert!(neighbor
            .assignment()
            .rows()
            .flatten()
            .all(|&v| v == NO_VEHICLE + 3 || v == NO_VEHICLE - 3));
        assert!(link.assignment().rows().flatten().all(|&v| v == NO_VEHICLE));
    }

    #[test]
    fn test_is_fleet_vehicle() {
        let link = LinkState::new(1, 1, 1, 2, 1);
        assert!(link.is_fleet_vehicle(0));
        assert!(link.is_fleet_vehicle(1));
        assert!(!link.is_fleet_vehicle(2));
        assert!(!link.is_fleet_vehicle(NO_VEHICLE));
    }
}
