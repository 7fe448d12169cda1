//! The evaluator contract between the search engine and the physics layer.
//!
//! The engine never computes losses itself. Each component or stage type
//! supplies an [`Evaluator`] that maps a discrete choice to a candidate,
//! gates it on static constraints, resolves its continuous parameters, and
//! reports loss per operating point plus static cost and volume.

use thiserror::Error;

use crate::grid::OperatingPoint;

/// A candidate that cannot be built or operated.
///
/// This is a normal search outcome, not an error: the enumerator counts and
/// discards it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("infeasible: {reason}")]
pub struct Infeasible {
    pub reason: String,
}

impl Infeasible {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Objectives that do not vary with the operating point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticProperties {
    pub cost: f64,
    /// Liters
    pub volume: f64,
}

impl StaticProperties {
    pub fn new(cost: f64, volume: f64) -> Self {
        Self { cost, volume }
    }
}

/// Capability interface implemented by every component/stage model.
///
/// The call order per candidate is fixed: [`candidate`](Evaluator::candidate)
/// → [`feasible`](Evaluator::feasible) → [`resolve`](Evaluator::resolve) →
/// [`evaluate`](Evaluator::evaluate) at every operating point →
/// [`static_properties`](Evaluator::static_properties) /
/// [`tag`](Evaluator::tag).
pub trait Evaluator: Send + Sync {
    type Candidate;

    /// Short identifier used in logs (e.g. "bridge", "inductor").
    fn name(&self) -> &str;

    /// Sizes of the discrete choice lists; the search space is their
    /// Cartesian product.
    fn choice_dimensions(&self) -> Vec<usize>;

    /// Build the candidate for one choice tuple. `None` when an index is out
    /// of range for the underlying catalogue.
    fn candidate(&self, choice: &[usize]) -> Option<Self::Candidate>;

    /// Static constraint gate, run before any expensive work.
    fn feasible(&self, candidate: &Self::Candidate) -> bool;

    /// Fill in derived continuous parameters by local search.
    fn resolve(&self, candidate: Self::Candidate) -> Result<Self::Candidate, Infeasible> {
        Ok(candidate)
    }

    /// Power loss in watts at one operating point.
    fn evaluate(
        &self,
        candidate: &Self::Candidate,
        operating_point: &OperatingPoint,
    ) -> Result<f64, Infeasible>;

    fn static_properties(&self, candidate: &Self::Candidate) -> StaticProperties;

    /// Configuration description stored with the design point.
    fn tag(&self, candidate: &Self::Candidate) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_display() {
        let err = Infeasible::new("junction above 150 C");
        assert_eq!(err.to_string(), "infeasible: junction above 150 C");
    }

    #[test]
    fn test_evaluator_is_object_safe_for_fixed_candidate() {
        fn _accepts(_e: &dyn Evaluator<Candidate = usize>) {}
    }
}
