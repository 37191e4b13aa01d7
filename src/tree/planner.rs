//! Per-entity trip planning.

use super::candidates::CandidateSet;
use crate::error::TreeBuildError;
use crate::graph::NodeId;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Start and finish of one entity to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripRequest {
    pub entity: usize,
    pub start: NodeId,
    pub finish: NodeId,
}

/// Builds one [`CandidateSet`] per request.
///
/// Results are returned in request order after every task has finished.
/// A failing entity does not affect the others. When `cancel` is set, tasks
/// that have not started yet report [`TreeBuildError::Cancelled`].
///
/// With the `parallel` feature the requests are spread over the rayon
/// thread pool, which is sized to the available hardware parallelism.
#[tracing::instrument(skip_all, fields(requests = requests.len(), nb_steps = nb_steps))]
pub fn plan_trips(
    requests: &[TripRequest],
    next_nodes: &[Vec<NodeId>],
    nb_steps: usize,
    cancel: Option<&AtomicBool>,
) -> Vec<Result<CandidateSet, TreeBuildError>> {
    let plan = |request: &TripRequest| plan_one(request, next_nodes, nb_steps, cancel);

    #[cfg(feature = "parallel")]
    let results: Vec<_> = requests.par_iter().map(plan).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = requests.iter().map(plan).collect();

    results
}

fn plan_one(
    request: &TripRequest,
    next_nodes: &[Vec<NodeId>],
    nb_steps: usize,
    cancel: Option<&AtomicBool>,
) -> Result<CandidateSet, TreeBuildError> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return Err(TreeBuildError::Cancelled);
    }
    match CandidateSet::plan(request.start, request.finish, nb_steps, next_nodes) {
        Ok(set) => {
            tracing::debug!(
                entity = request.entity,
                candidates = set.len(),
                depth = set.tree().depth(),
                "planned trips"
            );
            Ok(set)
        }
        Err(err) => {
            tracing::warn!(entity = request.entity, error = %err, "trip planning failed");
            Err(err)
        }
    }
}
