//! Synthetic instances: grid graphs and random endpoints.

use super::types::{NodeId, PathMap};
use crate::error::ConfigError;
use rand::Rng;

/// Square grid ("Manhattan") graph of `nb_nodes` nodes with waits.
///
/// Node `i` sits at row `i / side`, column `i % side` and links to its
/// horizontal and vertical neighbours in both directions.
///
/// # Examples
///
/// ```
/// use u_carpool::graph::manhattan_path_map;
///
/// let map = manhattan_path_map(9).unwrap();
/// assert!(map.allows(4, 1) && map.allows(4, 5) && map.allows(4, 4));
/// assert!(!map.allows(2, 3));
/// assert!(manhattan_path_map(8).is_err());
/// ```
pub fn manhattan_path_map(nb_nodes: usize) -> Result<PathMap, ConfigError> {
    if nb_nodes == 0 {
        return Err(ConfigError::InvalidDimension { name: "nb_nodes" });
    }
    let side = (nb_nodes as f64).sqrt().round() as usize;
    if side * side != nb_nodes {
        return Err(ConfigError::NotSquare { nb_nodes });
    }
    let mut edges = Vec::with_capacity(2 * nb_nodes);
    for node in 0..nb_nodes {
        if node % side != side - 1 {
            edges.push((node, node + 1));
        }
        if node + side < nb_nodes {
            edges.push((node, node + side));
        }
    }
    Ok(PathMap::undirected(nb_nodes, &edges, true))
}

/// Uniform random start and finish nodes for `nb_entity` entities, with
/// every finish differing from its start.
pub fn start_finish_nodes<R: Rng>(
    nb_entity: usize,
    nb_nodes: usize,
    rng: &mut R,
) -> Result<(Vec<NodeId>, Vec<NodeId>), ConfigError> {
    if nb_entity > 0 && nb_nodes < 2 {
        return Err(ConfigError::TooFewNodes {
            nb_nodes,
            required: 2,
        });
    }
    let starts: Vec<NodeId> = (0..nb_entity).map(|_| rng.random_range(0..nb_nodes)).collect();
    let finishes = starts
        .iter()
        .map(|&start| loop {
            let finish = rng.random_range(0..nb_nodes);
            if finish != start {
                break finish;
            }
        })
        .collect();
    Ok((starts, finishes))
}

/// Uniform random start nodes, e.g. for vehicles.
pub fn start_nodes<R: Rng>(
    nb_entity: usize,
    nb_nodes: usize,
    rng: &mut R,
) -> Result<Vec<NodeId>, ConfigError> {
    if nb_entity > 0 && nb_nodes == 0 {
        return Err(ConfigError::InvalidDimension { name: "nb_nodes" });
    }
    Ok((0..nb_entity).map(|_| rng.random_range(0..nb_nodes)).collect())
}
