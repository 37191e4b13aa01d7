//! Named checks, check selections and their outcome.

use std::fmt;

/// Named checks over a route layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteCheck {
    /// Step 0 leaves the start; for passengers the last step enters the
    /// finish and no step leaves the finish once reached.
    StartFinish,
    /// Every assigned cell is a legal edge of the path map.
    PathValidity,
    /// Each step starts where the previous one ended.
    Continuity,
    /// Every step holds exactly one assigned edge.
    ActionPerStep,
    /// Moving passengers never need more vehicles than the fleet has.
    FleetSize,
}

/// A family of named checks.
pub trait CheckKind: Copy + Ord + fmt::Debug + fmt::Display + 'static {
    /// Every check of the family, in evaluation order.
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;
}

impl CheckKind for RouteCheck {
    const ALL: &'static [RouteCheck] = &[
        RouteCheck::StartFinish,
        RouteCheck::PathValidity,
        RouteCheck::Continuity,
        RouteCheck::ActionPerStep,
        RouteCheck::FleetSize,
    ];

    fn name(&self) -> &'static str {
        match self {
            RouteCheck::StartFinish => "start_finish",
            RouteCheck::PathValidity => "path_validity",
            RouteCheck::Continuity => "continuity",
            RouteCheck::ActionPerStep => "action_per_step",
            RouteCheck::FleetSize => "fleet_size",
        }
    }
}

/// Named checks over the link layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkCheck {
    /// A passenger holds a fleet vehicle exactly while it is moving.
    RideLink,
    /// Vehicles in use match the number needed by moving passengers.
    VehicleCountConsistency,
    /// No vehicle carries more passengers than its capacity.
    VehicleCapacity,
    /// A vehicle and its riders traverse one common edge.
    SingleEdgePerVehicle,
}

impl CheckKind for LinkCheck {
    const ALL: &'static [LinkCheck] = &[
        LinkCheck::RideLink,
        LinkCheck::VehicleCountConsistency,
        LinkCheck::VehicleCapacity,
        LinkCheck::SingleEdgePerVehicle,
    ];

    fn name(&self) -> &'static str {
        match self {
            LinkCheck::RideLink => "ride_link",
            LinkCheck::VehicleCountConsistency => "vehicle_count_consistency",
            LinkCheck::VehicleCapacity => "vehicle_capacity",
            LinkCheck::SingleEdgePerVehicle => "single_edge_per_vehicle",
        }
    }
}

impl fmt::Display for RouteCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for LinkCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subset of checks to run. Defaults to every check.
///
/// # Examples
///
/// ```
/// use u_carpool::constraint::{Checks, RouteCheck};
///
/// let checks = Checks::all().without(RouteCheck::FleetSize);
/// assert!(!checks.contains(RouteCheck::FleetSize));
/// assert!(Checks::only(RouteCheck::Continuity).contains(RouteCheck::Continuity));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checks<K> {
    enabled: Vec<K>,
}

impl<K: CheckKind> Checks<K> {
    pub fn all() -> Self {
        Self {
            enabled: K::ALL.to_vec(),
        }
    }

    pub fn none() -> Self {
        Self {
            enabled: Vec::new(),
        }
    }

    pub fn only(check: K) -> Self {
        Self {
            enabled: vec![check],
        }
    }

    pub fn with(mut self, check: K) -> Self {
        if let Err(pos) = self.enabled.binary_search(&check) {
            self.enabled.insert(pos, check);
        }
        self
    }

    pub fn without(mut self, check: K) -> Self {
        self.enabled.retain(|&enabled| enabled != check);
        self
    }

    pub fn contains(&self, check: K) -> bool {
        self.enabled.binary_search(&check).is_ok()
    }

    /// Enabled checks in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.enabled.iter().copied()
    }
}

impl<K: CheckKind> Default for Checks<K> {
    fn default() -> Self {
        Self::all()
    }
}

/// Outcome of evaluating a set of checks.
///
/// Failures are counted per named check, not per offending cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintReport<K> {
    evaluated: Vec<K>,
    failed: Vec<K>,
}

impl<K: Copy> ConstraintReport<K> {
    pub(crate) fn new() -> Self {
        Self {
            evaluated: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, check: K, satisfied: bool) {
        self.evaluated.push(check);
        if !satisfied {
            self.failed.push(check);
        }
    }

    /// Whether every evaluated check passed.
    pub fn is_satisfied(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of failed checks.
    pub fn violations(&self) -> usize {
        self.failed.len()
    }

    pub fn failed(&self) -> &[K] {
        &self.failed
    }

    pub fn evaluated(&self) -> &[K] {
        &self.evaluated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_all_in_order() {
        let checks: Vec<_> = Checks::<RouteCheck>::all().iter().collect();
        assert_eq!(checks, RouteCheck::ALL.to_vec());
    }

    #[test]
    fn test_checks_with_is_idempotent() {
        let checks = Checks::none()
            .with(LinkCheck::VehicleCapacity)
            .with(LinkCheck::RideLink)
            .with(LinkCheck::VehicleCapacity);
        assert_eq!(
            checks.iter().collect::<Vec<_>>(),
            vec![LinkCheck::RideLink, LinkCheck::VehicleCapacity]
        );
    }

    #[test]
    fn test_report_counts_failed_checks() {
        let mut report = ConstraintReport::new();
        report.record(RouteCheck::Continuity, true);
        report.record(RouteCheck::StartFinish, false);
        assert!(!report.is_satisfied());
        assert_eq!(report.violations(), 1);
        assert_eq!(report.failed(), &[RouteCheck::StartFinish]);
        assert_eq!(report.evaluated().len(), 2);
    }

    #[test]
    fn test_names() {
        assert_eq!(RouteCheck::StartFinish.to_string(), "start_finish");
        assert_eq!(
            LinkCheck::SingleEdgePerVehicle.to_string(),
            "single_edge_per_vehicle"
        );
    }
}
