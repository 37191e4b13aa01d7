//! Pruned trip tree construction and traversal.

use crate::error::AddressError;
use crate::graph::{Edge, NodeId};
use rand::Rng;

/// One position of a trip tree.
///
/// Leaves are always the finish node. Internal branches always keep at
/// least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Leaf(NodeId),
    Internal(NodeId, Vec<Branch>),
}

impl Branch {
    /// The node stored at this position.
    pub fn node(&self) -> NodeId {
        match self {
            Branch::Leaf(node) | Branch::Internal(node, _) => *node,
        }
    }

    /// Kept children, in successor order.
    pub fn children(&self) -> &[Branch] {
        match self {
            Branch::Leaf(_) => &[],
            Branch::Internal(_, children) => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Branch::Leaf(_))
    }

    fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    fn leaf_count(&self) -> usize {
        match self {
            Branch::Leaf(_) => 1,
            Branch::Internal(_, children) => children.iter().map(Branch::leaf_count).sum(),
        }
    }
}

/// Every route from a start node to a finish node within a step budget.
///
/// # Examples
///
/// ```
/// use u_carpool::graph::{next_nodes, PathMap};
/// use u_carpool::tree::TripTree;
///
/// let map = PathMap::undirected(3, &[(0, 1), (1, 2)], true);
/// let tree = TripTree::build(0, 2, 2, &next_nodes(&map));
/// assert_eq!(tree.all_solutions(), vec![vec![0, 1, 2]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripTree {
    root: Option<Branch>,
    finish: NodeId,
    budget: usize,
}

impl TripTree {
    /// Builds the pruned tree of routes from `start` to `finish`.
    ///
    /// Successors are visited in the order of `next_nodes`, so identical
    /// inputs always produce identical trees. Yields an empty tree when no
    /// route fits the budget, and a single leaf when `start == finish`.
    pub fn build(start: NodeId, finish: NodeId, budget: usize, next_nodes: &[Vec<NodeId>]) -> Self {
        let root = if start == finish {
            Some(Branch::Leaf(finish))
        } else {
            grow(start, finish, budget, next_nodes)
        };
        Self {
            root,
            finish,
            budget,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Branch> {
        self.root.as_ref()
    }

    pub fn finish(&self) -> NodeId {
        self.finish
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Length of the longest stored route, in steps.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Branch::depth)
    }

    /// Number of complete routes.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, Branch::leaf_count)
    }

    /// Branch reached after following the first `depth` entries of `address`.
    fn walk(&self, address: &[usize], depth: usize) -> Result<&Branch, AddressError> {
        let root = self.root.as_ref().ok_or(AddressError::EmptyTree)?;
        if depth > address.len() {
            return Err(AddressError::DepthOutOfRange {
                depth,
                len: address.len(),
            });
        }
        let mut branch = root;
        for (level, &index) in address[..depth].iter().enumerate() {
            let children = branch.children();
            branch = children.get(index).ok_or(AddressError::ChildOutOfRange {
                depth: level,
                index,
                available: children.len(),
            })?;
        }
        Ok(branch)
    }

    /// Node reached after `depth` steps of `address`. Depth 0 is the root.
    pub fn node_at(&self, address: &[usize], depth: usize) -> Result<NodeId, AddressError> {
        self.walk(address, depth).map(Branch::node)
    }

    /// Node sequence of `address`, root included.
    pub fn solution_at(&self, address: &[usize]) -> Result<Vec<NodeId>, AddressError> {
        let mut branch = self.walk(address, 0)?;
        let mut nodes = Vec::with_capacity(address.len() + 1);
        nodes.push(branch.node());
        for (level, &index) in address.iter().enumerate() {
            let children = branch.children();
            branch = children.get(index).ok_or(AddressError::ChildOutOfRange {
                depth: level,
                index,
                available: children.len(),
            })?;
            nodes.push(branch.node());
        }
        Ok(nodes)
    }

    /// Edges of `address`, pairing consecutive nodes.
    pub fn edges_at(&self, address: &[usize]) -> Result<Vec<Edge>, AddressError> {
        let nodes = self.solution_at(address)?;
        Ok(nodes.windows(2).map(|w| Edge::new(w[0], w[1])).collect())
    }

    /// Every leaf address, depth-first, left to right.
    ///
    /// The result is sorted lexicographically.
    pub fn all_addresses(&self) -> Vec<Vec<usize>> {
        fn collect(branch: &Branch, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            if branch.is_leaf() {
                out.push(prefix.clone());
                return;
            }
            for (index, child) in branch.children().iter().enumerate() {
                prefix.push(index);
                collect(child, prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect(root, &mut Vec::new(), &mut out);
        }
        out
    }

    /// Every complete node sequence, in the order of [`all_addresses`](Self::all_addresses).
    pub fn all_solutions(&self) -> Vec<Vec<NodeId>> {
        fn collect(branch: &Branch, trail: &mut Vec<NodeId>, out: &mut Vec<Vec<NodeId>>) {
            trail.push(branch.node());
            if branch.is_leaf() {
                out.push(trail.clone());
            } else {
                for child in branch.children() {
                    collect(child, trail, out);
                }
            }
            trail.pop();
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect(root, &mut Vec::new(), &mut out);
        }
        out
    }

    /// An alternative leaf address that changes the choice made at `level`.
    ///
    /// The child index at `level` moves to the next sibling, wrapping to 0.
    /// Below `level` the walk prefers, at each depth, the first child whose
    /// node equals the node `address` reached at that depth, and otherwise
    /// picks a child uniformly at random. The walk stops at a leaf, and every
    /// leaf is the finish node, so the result always ends at the finish.
    ///
    /// When the branch at `level` has a single child the choice cannot change
    /// and the result follows the original route as closely as possible.
    pub fn neighbor<R: Rng>(
        &self,
        address: &[usize],
        level: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, AddressError> {
        if level >= address.len() {
            return Err(AddressError::LevelOutOfRange {
                level,
                len: address.len(),
            });
        }
        let original = self.solution_at(address)?;
        let parent = self.walk(address, level)?;
        let siblings = parent.children();

        let mut next = address[..level].to_vec();
        next.push((address[level] + 1) % siblings.len());
        let mut branch = &siblings[next[level]];

        while let Branch::Internal(_, children) = branch {
            let depth = next.len() + 1;
            let index = original
                .get(depth)
                .and_then(|target| children.iter().position(|child| child.node() == *target))
                .unwrap_or_else(|| rng.random_range(0..children.len()));
            next.push(index);
            branch = &children[index];
        }
        Ok(next)
    }
}

fn grow(node: NodeId, finish: NodeId, budget: usize, next_nodes: &[Vec<NodeId>]) -> Option<Branch> {
    if node == finish {
        return Some(Branch::Leaf(finish));
    }
    if budget == 0 {
        return None;
    }
    let children: Vec<Branch> = next_nodes
        .get(node)
        .map_or(&[][..], Vec::as_slice)
        .iter()
        .filter_map(|&next| grow(next, finish, budget - 1, next_nodes))
        .collect();
    if children.is_empty() {
        None
    } else {
        Some(Branch::Internal(node, children))
    }
}
