//! Problem configuration.

use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Sizes and weights of one carpooling problem.
///
/// # Examples
///
/// ```
/// use u_carpool::problem::CarpoolConfig;
///
/// let config = CarpoolConfig::default()
///     .with_nb_steps(6)
///     .with_nb_nodes(4)
///     .with_nb_passengers(3)
///     .with_nb_vehicles(2)
///     .with_vehicle_capacity(2)
///     .with_alpha(0.3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarpoolConfig {
    /// Planning horizon, in steps. Also the trip-tree budget.
    pub nb_steps: usize,

    /// Number of graph nodes.
    pub nb_nodes: usize,

    pub nb_passengers: usize,

    /// Fleet size.
    pub nb_vehicles: usize,

    /// Passengers one vehicle can carry at once.
    pub vehicle_capacity: usize,

    /// Balance between passenger travel time (`0.0`) and number of vehicles
    /// used (`1.0`).
    pub alpha: f64,

    /// Cost added per failed named check.
    pub violation_penalty: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for CarpoolConfig {
    fn default() -> Self {
        Self {
            nb_steps: 10,
            nb_nodes: 0,
            nb_passengers: 0,
            nb_vehicles: 1,
            vehicle_capacity: 1,
            alpha: 0.5,
            violation_penalty: 1000.0,
            seed: None,
        }
    }
}

impl CarpoolConfig {
    pub fn with_nb_steps(mut self, n: usize) -> Self {
        self.nb_steps = n;
        self
    }

    pub fn with_nb_nodes(mut self, n: usize) -> Self {
        self.nb_nodes = n;
        self
    }

    pub fn with_nb_passengers(mut self, n: usize) -> Self {
        self.nb_passengers = n;
        self
    }

    pub fn with_nb_vehicles(mut self, n: usize) -> Self {
        self.nb_vehicles = n;
        self
    }

    pub fn with_vehicle_capacity(mut self, capacity: usize) -> Self {
        self.vehicle_capacity = capacity;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_violation_penalty(mut self, penalty: f64) -> Self {
        self.violation_penalty = penalty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nb_steps == 0 {
            return Err(ConfigError::InvalidDimension { name: "nb_steps" });
        }
        if self.nb_nodes == 0 {
            return Err(ConfigError::InvalidDimension { name: "nb_nodes" });
        }
        if self.nb_passengers > 0 && (self.nb_vehicles == 0 || self.vehicle_capacity == 0) {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.vehicle_capacity,
                nb_vehicles: self.nb_vehicles,
                nb_passengers: self.nb_passengers,
            });
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if !(self.violation_penalty >= 0.0 && self.violation_penalty.is_finite()) {
            return Err(ConfigError::InvalidPenalty(self.violation_penalty));
        }
        Ok(())
    }

    /// Random generator seeded from [`seed`](Self::seed), or from entropy
    /// when unset.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed.unwrap_or_else(rand::random))
    }
}
