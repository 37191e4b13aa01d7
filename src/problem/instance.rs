//! Problem inputs and solve construction.

use super::config::CarpoolConfig;
use super::solve::Solve;
use crate::error::ConfigError;
use crate::graph::{Network, NodeId, PathMap, TimeMap};
use crate::state::{Anchor, FleetLimits, LinkState, RouteState};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A validated carpooling instance: graph plus entity endpoints.
#[derive(Debug, Clone)]
pub struct Problem {
    config: CarpoolConfig,
    network: Arc<Network>,
    passenger_starts: Vec<NodeId>,
    passenger_finishes: Vec<NodeId>,
    vehicle_starts: Vec<NodeId>,
    time_map: Option<Arc<TimeMap>>,
}

impl Problem {
    pub fn new(
        config: CarpoolConfig,
        path_map: PathMap,
        passenger_starts: Vec<NodeId>,
        passenger_finishes: Vec<NodeId>,
        vehicle_starts: Vec<NodeId>,
    ) -> Result<Self, ConfigError> {
        let problem = Self {
            config,
            network: Arc::new(Network::new(path_map)),
            passenger_starts,
            passenger_finishes,
            vehicle_starts,
            time_map: None,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Weights passenger travel time by per-edge times instead of counting
    /// steps.
    pub fn with_time_map(mut self, time_map: TimeMap) -> Result<Self, ConfigError> {
        self.time_map = Some(Arc::new(time_map));
        self.validate()?;
        Ok(self)
    }

    /// Checks the configuration, the graph size, entity counts and that
    /// every endpoint is a node of the graph.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let config = &self.config;
        config.validate()?;
        if self.network.nb_nodes() != config.nb_nodes {
            return Err(ConfigError::PathMapShape {
                expected: config.nb_nodes,
                found: self.network.nb_nodes(),
            });
        }
        if let Some(time_map) = self.time_map.as_deref() {
            if time_map.nb_nodes() != config.nb_nodes {
                return Err(ConfigError::TimeMapShape {
                    expected: config.nb_nodes,
                    found: time_map.nb_nodes(),
                });
            }
        }
        let lists = [
            ("passenger start points", &self.passenger_starts, config.nb_passengers),
            ("passenger finish points", &self.passenger_finishes, config.nb_passengers),
            ("vehicle start points", &self.vehicle_starts, config.nb_vehicles),
        ];
        for (name, nodes, expected) in lists {
            if nodes.len() != expected {
                return Err(ConfigError::EntityCountMismatch {
                    name,
                    expected,
                    found: nodes.len(),
                });
            }
        }
        let roles = [
            ("passenger start", &self.passenger_starts),
            ("passenger finish", &self.passenger_finishes),
            ("vehicle start", &self.vehicle_starts),
        ];
        for (role, nodes) in roles {
            if let Some((entity, &node)) = nodes
                .iter()
                .enumerate()
                .find(|&(_, &node)| node >= config.nb_nodes)
            {
                return Err(ConfigError::NodeOutOfRange {
                    role,
                    entity,
                    node,
                    nb_nodes: config.nb_nodes,
                });
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &CarpoolConfig {
        &self.config
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn time_map(&self) -> Option<&TimeMap> {
        self.time_map.as_deref()
    }

    /// Builds the three layers of a solve. See [`solve_with_cancel`](Self::solve_with_cancel).
    pub fn solve(&self) -> Result<Solve, ConfigError> {
        self.solve_with_cancel(None)
    }

    /// Builds the ride, drive and link layers, planning every passenger's
    /// candidate trips concurrently.
    ///
    /// Fails with the first passenger that has no feasible trip within the
    /// horizon, or whose planning was cancelled through `cancel`.
    pub fn solve_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> Result<Solve, ConfigError> {
        let config = &self.config;
        let passengers = self
            .passenger_starts
            .iter()
            .zip(&self.passenger_finishes)
            .map(|(&start, &finish)| Anchor::passenger(start, finish))
            .collect();
        let fleet = FleetLimits {
            nb_vehicles: config.nb_vehicles,
            capacity: config.vehicle_capacity,
        };
        let mut ride = RouteState::ride(config.nb_steps, Arc::clone(&self.network), passengers, fleet)?;
        ride.plan_candidates(cancel.as_deref());
        ride.require_candidates()?;

        let vehicles = self.vehicle_starts.iter().map(|&start| Anchor::vehicle(start)).collect();
        let drive = RouteState::drive(config.nb_steps, Arc::clone(&self.network), vehicles)?;
        let link = LinkState::new(
            config.nb_steps,
            config.nb_nodes,
            config.nb_passengers,
            config.nb_vehicles,
            config.vehicle_capacity,
        );

        tracing::info!(
            nb_steps = config.nb_steps,
            nb_nodes = config.nb_nodes,
            nb_passengers = config.nb_passengers,
            nb_vehicles = config.nb_vehicles,
            "solve built"
        );
        let solve = Solve::new(ride, drive, link, config.alpha, config.violation_penalty);
        Ok(match &self.time_map {
            Some(time_map) => solve.with_time_map(Arc::clone(time_map)),
            None => solve,
        })
    }
}
