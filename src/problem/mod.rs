//! Carpooling problems: configuration, inputs and the solve built from them.
//!
//! A [`Problem`] validates its inputs once. [`Problem::solve`] plans every
//! passenger's trip tree, then returns a [`Solve`] holding the ride, drive and
//! link layers ready for a search driver to initialize, perturb and score.
//!
//! # Examples
//!
//! ```
//! use u_carpool::graph::PathMap;
//! use u_carpool::problem::{CarpoolConfig, Problem};
//!
//! let config = CarpoolConfig::default()
//!     .with_nb_steps(3)
//!     .with_nb_nodes(3)
//!     .with_nb_passengers(1)
//!     .with_nb_vehicles(1)
//!     .with_seed(1);
//! let map = PathMap::undirected(3, &[(0, 1), (1, 2)], true);
//! let problem = Problem::new(config, map, vec![0], vec![2], vec![0]).unwrap();
//!
//! let mut solve = problem.solve().unwrap();
//! let mut rng = problem.config().rng();
//! solve.initialize(&mut rng).unwrap();
//! solve.check_all();
//! assert!(solve.cost() >= 0.0);
//! ```

mod config;
mod instance;
mod solve;

pub use config::CarpoolConfig;
pub use instance::Problem;
pub use solve::Solve;
