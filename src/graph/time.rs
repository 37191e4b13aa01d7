//! Per-edge travel times.

use super::types::{Edge, NodeId};
use crate::error::ConfigError;

/// Square matrix of travel times, indexed like a [`PathMap`](super::PathMap).
///
/// Entry `(i, i)` is the cost of waiting one step at `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>"))]
pub struct TimeMap {
    rows: Vec<Vec<f64>>,
}

impl TryFrom<Vec<Vec<f64>>> for TimeMap {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TimeMap> for Vec<Vec<f64>> {
    fn from(map: TimeMap) -> Self {
        map.rows
    }
}

impl TimeMap {
    /// Builds a time map from rows, rejecting non-square input and times
    /// that are negative or not finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let n = rows.len();
        if n == 0 {
            return Err(ConfigError::InvalidDimension { name: "nb_nodes" });
        }
        for (from, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ConfigError::TimeMapShape {
                    expected: n,
                    found: row.len(),
                });
            }
            if let Some((to, &time)) = row
                .iter()
                .enumerate()
                .find(|&(_, &time)| !(time >= 0.0 && time.is_finite()))
            {
                return Err(ConfigError::InvalidTime { from, to, time });
            }
        }
        Ok(Self { rows })
    }

    /// Every edge, waits included, takes `time`.
    pub fn uniform(nb_nodes: usize, time: f64) -> Self {
        Self {
            rows: vec![vec![time; nb_nodes]; nb_nodes],
        }
    }

    pub fn nb_nodes(&self) -> usize {
        self.rows.len()
    }

    /// Travel time of one step from `from` to `to`; `0.0` out of range.
    pub fn time(&self, from: NodeId, to: NodeId) -> f64 {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn edge_time(&self, edge: Edge) -> f64 {
        self.time(edge.from, edge.to)
    }
}
