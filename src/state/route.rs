//! Route layers: one edge per entity per step.

use super::chance;
use super::matrix::{Assignment, Dimensions, RouteCell};
use crate::error::{AddressError, ConfigError, TreeBuildError};
use crate::graph::{Edge, Network, NodeId};
use crate::tree::{plan_trips, CandidateSet, TripRequest};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Which entities a route layer describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Passengers: start and finish are pinned.
    Ride,
    /// Vehicles: only the start is pinned.
    Drive,
}

/// Fixed endpoints of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub start: NodeId,
    pub finish: Option<NodeId>,
}

impl Anchor {
    pub fn passenger(start: NodeId, finish: NodeId) -> Self {
        Self {
            start,
            finish: Some(finish),
        }
    }

    pub fn vehicle(start: NodeId) -> Self {
        Self {
            start,
            finish: None,
        }
    }
}

/// Fleet parameters used by the ride layer's fleet-size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FleetLimits {
    pub nb_vehicles: usize,
    pub capacity: usize,
}

impl FleetLimits {
    /// Vehicles needed to carry `riders` passengers at once.
    pub fn vehicles_needed(&self, riders: usize) -> usize {
        riders.div_ceil(self.capacity.max(1))
    }
}

/// Precomputed trips of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSlot {
    /// No trip tree was requested, e.g. vehicles without a finish.
    Unplanned,
    Planned(CandidateSet),
    Infeasible(TreeBuildError),
}

/// A route layer: passenger routes or vehicle routes.
///
/// The network, anchors and candidate trips are shared read-only between
/// clones; the cell matrix, selected candidates and violation count are
/// owned, so a clone can be mutated and checked independently.
#[derive(Debug, Clone)]
pub struct RouteState {
    kind: RouteKind,
    network: Arc<Network>,
    anchors: Arc<[Anchor]>,
    fleet: Option<FleetLimits>,
    candidates: Arc<[CandidateSlot]>,
    assignment: Assignment<RouteCell>,
    selected: Vec<Option<usize>>,
    pub(crate) violation_count: usize,
}

impl RouteState {
    /// Passenger layer.
    pub fn ride(
        nb_steps: usize,
        network: Arc<Network>,
        passengers: Vec<Anchor>,
        fleet: FleetLimits,
    ) -> Result<Self, ConfigError> {
        Self::new(RouteKind::Ride, nb_steps, network, passengers, Some(fleet))
    }

    /// Vehicle layer.
    pub fn drive(
        nb_steps: usize,
        network: Arc<Network>,
        vehicles: Vec<Anchor>,
    ) -> Result<Self, ConfigError> {
        Self::new(RouteKind::Drive, nb_steps, network, vehicles, None)
    }

    fn new(
        kind: RouteKind,
        nb_steps: usize,
        network: Arc<Network>,
        anchors: Vec<Anchor>,
        fleet: Option<FleetLimits>,
    ) -> Result<Self, ConfigError> {
        if nb_steps == 0 {
            return Err(ConfigError::InvalidDimension { name: "nb_steps" });
        }
        let nb_nodes = network.nb_nodes();
        for (entity, anchor) in anchors.iter().enumerate() {
            let nodes = [("start", Some(anchor.start)), ("finish", anchor.finish)];
            for (role, node) in nodes {
                if let Some(node) = node.filter(|&node| node >= nb_nodes) {
                    return Err(ConfigError::NodeOutOfRange {
                        role,
                        entity,
                        node,
                        nb_nodes,
                    });
                }
            }
        }
        if kind == RouteKind::Ride && anchors.iter().any(|a| a.finish.is_none()) {
            return Err(ConfigError::EntityCountMismatch {
                name: "passenger finish points",
                expected: anchors.len(),
                found: anchors.iter().filter(|a| a.finish.is_some()).count(),
            });
        }

        let nb_entity = anchors.len();
        let dims = Dimensions {
            nb_steps,
            nb_nodes,
            nb_entity,
        };
        Ok(Self {
            kind,
            network,
            anchors: anchors.into(),
            fleet,
            candidates: vec![CandidateSlot::Unplanned; nb_entity].into(),
            assignment: Assignment::new(dims),
            selected: vec![None; nb_entity],
            violation_count: 0,
        })
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn dimensions(&self) -> Dimensions {
        self.assignment.dimensions()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn fleet(&self) -> Option<FleetLimits> {
        self.fleet
    }

    pub fn assignment(&self) -> &Assignment<RouteCell> {
        &self.assignment
    }

    /// Number of named checks that failed in the last [`check_constraint`](Self::check_constraint).
    pub fn violation_count(&self) -> usize {
        self.violation_count
    }

    /// Edge at `(entity, step)`; `None` when unassigned or out of range.
    pub fn cell(&self, entity: usize, step: usize) -> RouteCell {
        self.assignment.get(entity, step).flatten()
    }

    /// Whether `entity` changes node at `step`.
    pub fn is_moving(&self, entity: usize, step: usize) -> bool {
        self.cell(entity, step).is_some_and(|edge| !edge.is_wait())
    }

    /// Number of entities changing node at `step`.
    pub fn moving_count(&self, step: usize) -> usize {
        self.assignment
            .column(step)
            .filter(|cell| cell.is_some_and(|edge| !edge.is_wait()))
            .count()
    }

    pub fn set_cell(&mut self, entity: usize, step: usize, cell: RouteCell) {
        self.assignment.set(entity, step, cell);
        self.selected[entity] = None;
    }

    /// Overwrites the first `route.len()` steps of `entity`.
    pub fn set_route(&mut self, entity: usize, route: &[Edge]) {
        let row = self.assignment.row_mut(entity);
        for (cell, &edge) in row.iter_mut().zip(route) {
            *cell = Some(edge);
        }
        self.selected[entity] = None;
    }

    /// Candidate trips of `entity`.
    pub fn candidate_slot(&self, entity: usize) -> &CandidateSlot {
        &self.candidates[entity]
    }

    /// Index of the candidate currently installed for `entity`, if any.
    pub fn selected(&self, entity: usize) -> Option<usize> {
        self.selected.get(entity).copied().flatten()
    }

    /// Installs per-entity planning results.
    ///
    /// `results[i]` belongs to entity `i`; `None` leaves it unplanned.
    pub fn install_candidates(&mut self, results: Vec<Option<Result<CandidateSet, TreeBuildError>>>) {
        let mut slots: Vec<CandidateSlot> = results
            .into_iter()
            .map(|result| match result {
                None => CandidateSlot::Unplanned,
                Some(Ok(set)) => CandidateSlot::Planned(set),
                Some(Err(err)) => CandidateSlot::Infeasible(err),
            })
            .collect();
        slots.resize(self.dimensions().nb_entity, CandidateSlot::Unplanned);
        self.candidates = slots.into();
        self.selected.fill(None);
    }

    /// Plans candidate trips for every entity with a finish node.
    ///
    /// Trees are built concurrently and installed after all of them finish.
    pub fn plan_candidates(&mut self, cancel: Option<&AtomicBool>) {
        let requests: Vec<TripRequest> = self
            .anchors
            .iter()
            .enumerate()
            .filter_map(|(entity, anchor)| {
                anchor.finish.map(|finish| TripRequest {
                    entity,
                    start: anchor.start,
                    finish,
                })
            })
            .collect();
        let next_nodes = self.network.adjacency().successors();
        let planned = plan_trips(&requests, next_nodes, self.dimensions().nb_steps, cancel);

        let mut results: Vec<Option<Result<CandidateSet, TreeBuildError>>> =
            vec![None; self.dimensions().nb_entity];
        for (request, result) in requests.iter().zip(planned) {
            results[request.entity] = Some(result);
        }
        self.install_candidates(results);
    }

    /// Fails with the first entity whose planning produced no trip.
    pub fn require_candidates(&self) -> Result<(), ConfigError> {
        for (entity, slot) in self.candidates.iter().enumerate() {
            match slot {
                CandidateSlot::Infeasible(TreeBuildError::NoRoute { .. }) => {
                    return Err(ConfigError::NoFeasibleTrip { entity })
                }
                CandidateSlot::Infeasible(err) => {
                    return Err(ConfigError::Planning {
                        entity,
                        source: err.clone(),
                    })
                }
                CandidateSlot::Planned(set) if set.is_empty() => {
                    return Err(ConfigError::NoFeasibleTrip { entity })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Randomizes the layer.
    ///
    /// Anchored steps are always redrawn: step 0 leaves the start, and for
    /// passengers the last step enters the finish. Every other step is
    /// redrawn with probability `rate` as a legal edge leaving the node the
    /// previous step ended at. The result is graph-legal but not
    /// necessarily feasible.
    pub fn shuffle<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        let dims = self.dimensions();
        let network = Arc::clone(&self.network);
        let anchors = Arc::clone(&self.anchors);

        for (entity, anchor) in anchors.iter().enumerate() {
            let pinned_last = self.initiate_shuffle(entity, anchor, rng);
            let end = if pinned_last {
                dims.nb_steps - 1
            } else {
                dims.nb_steps
            };
            for step in 1..end {
                if !chance(rng, rate) {
                    continue;
                }
                let from = match self.assignment.get(entity, step - 1).flatten() {
                    Some(prev) => prev.to,
                    None => rng.random_range(0..dims.nb_nodes),
                };
                if let Some(edge) = pick(network.next_edges(from), rng) {
                    self.assignment.set(entity, step, Some(edge));
                }
            }
            self.selected[entity] = None;
        }
    }

    /// Pins the anchored steps of `entity`. Returns whether the last step
    /// was pinned.
    fn initiate_shuffle<R: Rng>(&mut self, entity: usize, anchor: &Anchor, rng: &mut R) -> bool {
        if let Some(edge) = pick(self.network.next_edges(anchor.start), rng) {
            self.assignment.set(entity, 0, Some(edge));
        }
        match (self.kind, anchor.finish) {
            (RouteKind::Ride, Some(finish)) => {
                let last = self.dimensions().nb_steps - 1;
                let edge = if last == 0 {
                    // a single step must both leave the start and enter the finish
                    let direct: Vec<Edge> = self
                        .network
                        .next_edges(anchor.start)
                        .iter()
                        .filter(|edge| edge.to == finish)
                        .copied()
                        .collect();
                    pick(&direct, rng)
                } else {
                    pick(self.network.incoming_edges(finish), rng)
                };
                if let Some(edge) = edge {
                    self.assignment.set(entity, last, Some(edge));
                }
                true
            }
            _ => false,
        }
    }

    /// Installs one uniformly chosen candidate trip per planned entity.
    ///
    /// Fails without modifying the layer when an entity's planning failed.
    pub fn tree_shuffle<R: Rng>(&mut self, rng: &mut R) -> Result<(), ConfigError> {
        self.require_candidates()?;
        let candidates = Arc::clone(&self.candidates);
        for (entity, slot) in candidates.iter().enumerate() {
            if let CandidateSlot::Planned(set) = slot {
                let index = rng.random_range(0..set.len());
                self.install(entity, set, index);
            }
        }
        Ok(())
    }

    fn install(&mut self, entity: usize, set: &CandidateSet, index: usize) {
        if let Some(candidate) = set.get(index) {
            let row = self.assignment.row_mut(entity);
            for (cell, &edge) in row.iter_mut().zip(&candidate.route) {
                *cell = Some(edge);
            }
            self.selected[entity] = Some(index);
        }
    }

    /// Raw perturbation returning a new layer.
    ///
    /// Each assigned step is picked with probability `rate`; its end node is
    /// shifted by `temperature` up or down, clamped to the node range, and
    /// the next step starts from the new node. The new edge may be illegal.
    pub fn get_neighbor<R: Rng>(&self, rate: f64, temperature: usize, rng: &mut R) -> RouteState {
        let mut neighbor = self.clone();
        let dims = self.dimensions();
        let top = dims.nb_nodes.saturating_sub(1);

        for entity in 0..dims.nb_entity {
            for step in 0..dims.nb_steps {
                let Some(edge) = neighbor.cell(entity, step) else {
                    continue;
                };
                if !chance(rng, rate) {
                    continue;
                }
                let to = if rng.random_bool(0.5) {
                    edge.to.saturating_add(temperature).min(top)
                } else {
                    edge.to.saturating_sub(temperature)
                };
                neighbor.assignment.set(entity, step, Some(Edge::new(edge.from, to)));
                if let Some(next) = neighbor.cell(entity, step + 1) {
                    neighbor
                        .assignment
                        .set(entity, step + 1, Some(Edge::new(to, next.to)));
                }
                neighbor.selected[entity] = None;
            }
        }
        neighbor
    }

    /// Advances, with probability `temperature` per planned entity, to the
    /// next candidate trip in cyclic order and installs it.
    ///
    /// Installed routes are always legal, continuous and anchored.
    pub fn get_tree_neighbor<R: Rng>(&mut self, temperature: f64, rng: &mut R) {
        let candidates = Arc::clone(&self.candidates);
        for (entity, slot) in candidates.iter().enumerate() {
            let CandidateSlot::Planned(set) = slot else {
                continue;
            };
            if set.is_empty() || !chance(rng, temperature) {
                continue;
            }
            let index = self.selected[entity].map_or(0, |i| (i + 1) % set.len());
            self.install(entity, set, index);
        }
    }

    /// Moves, with probability `rate` per entity, to a trip-tree neighbor of
    /// the installed candidate at a uniformly chosen level.
    ///
    /// Only entities with an installed candidate take part.
    pub fn get_address_neighbor<R: Rng>(&mut self, rate: f64, rng: &mut R) -> Result<(), AddressError> {
        let candidates = Arc::clone(&self.candidates);
        for (entity, slot) in candidates.iter().enumerate() {
            let (CandidateSlot::Planned(set), Some(current)) = (slot, self.selected[entity]) else {
                continue;
            };
            let Some(candidate) = set.get(current) else {
                continue;
            };
            if candidate.address.is_empty() || !chance(rng, rate) {
                continue;
            }
            let level = rng.random_range(0..candidate.address.len());
            let address = set.tree().neighbor(&candidate.address, level, rng)?;
            if let Some(index) = set.position(&address) {
                self.install(entity, set, index);
            }
        }
        Ok(())
    }

    /// Node sequence visited by `entity`, waits included.
    pub fn trip(&self, entity: usize) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for edge in self.assignment.row(entity).iter().flatten() {
            if nodes.is_empty() {
                nodes.push(edge.from);
            }
            nodes.push(edge.to);
        }
        nodes
    }

    /// Ordered non-wait edges of `entity`.
    pub fn moves(&self, entity: usize) -> Vec<Edge> {
        self.assignment
            .row(entity)
            .iter()
            .flatten()
            .filter(|edge| !edge.is_wait())
            .copied()
            .collect()
    }
}

fn pick<R: Rng>(edges: &[Edge], rng: &mut R) -> Option<Edge> {
    if edges.is_empty() {
        None
    } else {
        Some(edges[rng.random_range(0..edges.len())])
    }
}
