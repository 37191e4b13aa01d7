//! Generic `[entity][step]` cell matrix.

use crate::graph::Edge;
use std::fmt;

/// Vehicle identifier stored in the link layer.
///
/// Signed because link perturbations are unclamped and may leave the valid
/// range; validation reports such values.
pub type VehicleId = i64;

/// Link-layer sentinel: the passenger rides no vehicle.
pub const NO_VEHICLE: VehicleId = -1;

/// Route-layer cell. `None` means the step is not assigned yet.
pub type RouteCell = Option<Edge>;

/// A value that can fill an assignment matrix.
pub trait Cell: Copy + PartialEq + fmt::Debug + Send + Sync {
    /// The "not assigned" value a fresh matrix is filled with.
    const EMPTY: Self;

    fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Cell for RouteCell {
    const EMPTY: Self = None;
}

impl Cell for VehicleId {
    const EMPTY: Self = NO_VEHICLE;
}

/// Fixed dimensions of one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub nb_steps: usize,
    pub nb_nodes: usize,
    pub nb_entity: usize,
}

/// Mutable per-entity, per-step table.
///
/// Never resized after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<C: Cell> {
    dims: Dimensions,
    cells: Vec<Vec<C>>,
}

impl<C: Cell> Assignment<C> {
    /// Creates a matrix filled with [`Cell::EMPTY`].
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![vec![C::EMPTY; dims.nb_steps]; dims.nb_entity],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Cell at `(entity, step)`, `None` when out of range.
    pub fn get(&self, entity: usize, step: usize) -> Option<C> {
        self.cells.get(entity).and_then(|row| row.get(step)).copied()
    }

    /// Overwrites one cell.
    ///
    /// # Panics
    /// Panics if `entity` or `step` is out of range.
    pub fn set(&mut self, entity: usize, step: usize, value: C) {
        self.cells[entity][step] = value;
    }

    /// All steps of one entity.
    ///
    /// # Panics
    /// Panics if `entity` is out of range.
    pub fn row(&self, entity: usize) -> &[C] {
        &self.cells[entity]
    }

    pub fn row_mut(&mut self, entity: usize) -> &mut [C] {
        &mut self.cells[entity]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[C]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [C]> {
        self.cells.iter_mut().map(Vec::as_mut_slice)
    }

    /// One step across all entities.
    pub fn column(&self, step: usize) -> impl Iterator<Item = C> + '_ {
        self.cells.iter().filter_map(move |row| row.get(step).copied())
    }

    /// Resets every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(C::EMPTY);
        }
    }

    /// Whether no cell is empty.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }
}
