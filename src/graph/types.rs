//! Graph value types.

use crate::error::ConfigError;

/// Index of a node in `[0, nb_nodes)`.
pub type NodeId = usize;

/// A directed one-step move. `from == to` is a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// A self-loop edge at `node`.
    pub fn wait(node: NodeId) -> Self {
        Self { from: node, to: node }
    }

    /// Whether this edge keeps the entity in place.
    pub fn is_wait(&self) -> bool {
        self.from == self.to
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((from, to): (NodeId, NodeId)) -> Self {
        Self { from, to }
    }
}

/// Square boolean reachability matrix.
///
/// `allows(i, j)` for `i != j` means a direct edge exists; `allows(i, i)`
/// means waiting at `i` is legal. The matrix need not be symmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>"))]
pub struct PathMap {
    rows: Vec<Vec<bool>>,
}

impl TryFrom<Vec<Vec<bool>>> for PathMap {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PathMap> for Vec<Vec<bool>> {
    fn from(map: PathMap) -> Self {
        map.rows
    }
}

impl PathMap {
    /// Builds a path map from rows, rejecting non-square input.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ConfigError> {
        let n = rows.len();
        if n == 0 {
            return Err(ConfigError::InvalidDimension { name: "nb_nodes" });
        }
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(ConfigError::PathMapShape {
                expected: n,
                found: row.len(),
            });
        }
        Ok(Self { rows })
    }

    /// Builds an undirected path map from an edge list.
    ///
    /// When `with_waits` is set every node also gets a self-loop.
    pub fn undirected(nb_nodes: usize, edges: &[(NodeId, NodeId)], with_waits: bool) -> Self {
        let mut rows = vec![vec![false; nb_nodes]; nb_nodes];
        for &(a, b) in edges {
            if a < nb_nodes && b < nb_nodes {
                rows[a][b] = true;
                rows[b][a] = true;
            }
        }
        if with_waits {
            for (i, row) in rows.iter_mut().enumerate() {
                row[i] = true;
            }
        }
        Self { rows }
    }

    /// Number of nodes.
    pub fn nb_nodes(&self) -> usize {
        self.rows.len()
    }

    /// Whether moving from `from` to `to` in one step is legal.
    ///
    /// Out-of-range indices are never legal.
    pub fn allows(&self, from: NodeId, to: NodeId) -> bool {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(false)
    }

    /// Whether `edge` is legal.
    pub fn allows_edge(&self, edge: Edge) -> bool {
        self.allows(edge.from, edge.to)
    }

    /// Successor flags of `node`.
    pub fn row(&self, node: NodeId) -> &[bool] {
        &self.rows[node]
    }
}
