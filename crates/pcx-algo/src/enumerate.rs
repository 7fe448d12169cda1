//! Generic enumerate-evaluate-prune search.
//!
//! Every component or stage search has the same shape: walk the Cartesian
//! product of discrete choices, gate each candidate on static constraints,
//! resolve its continuous parameters, evaluate it over the operating grid,
//! and insert the resulting design point into a frontier. Only the
//! [`Evaluator`] differs between component kinds.
//!
//! ```text
//! for choice in devices × windings × ...:
//!     candidate ── feasible? ──► resolve ──► weighted loss over grid ──► insert
//!                    │ no          │ infeasible      │ any point infeasible
//!                    ▼             ▼                 ▼
//!                 discard       discard           discard
//! ```
//!
//! With the `desktop` feature and [`SearchConfig::parallel`] set, choices are
//! evaluated on the rayon pool. Each worker fills its own frontier and the
//! worker frontiers are merged at the end, so only the merge is serialized.

use pcx_core::{Convention, DesignPoint, ParetoFrontier};
#[cfg(feature = "desktop")]
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::evaluator::Evaluator;

/// Cartesian product of discrete index ranges, last dimension fastest.
///
/// An empty dimension yields nothing; zero dimensions yield a single empty
/// choice.
#[derive(Debug, Clone)]
pub struct ChoiceSpace {
    dimensions: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl ChoiceSpace {
    pub fn new(dimensions: Vec<usize>) -> Self {
        let next = if dimensions.iter().any(|&d| d == 0) {
            None
        } else {
            Some(vec![0; dimensions.len()])
        };
        Self { dimensions, next }
    }

    /// Total number of choices in the space.
    pub fn size(&self) -> usize {
        self.dimensions.iter().product()
    }
}

impl Iterator for ChoiceSpace {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for axis in (0..successor.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.dimensions[axis] {
                self.next = Some(successor);
                return Some(current);
            }
            successor[axis] = 0;
        }
        Some(current)
    }
}

/// Counters for one enumeration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    pub candidates: usize,
    /// Out-of-range index or static constraint violation
    pub rejected_static: usize,
    /// Continuous-parameter search found no valid value
    pub rejected_resolve: usize,
    /// Infeasible at one or more operating points
    pub rejected_operating: usize,
    /// Evaluator produced objective values that failed validation
    pub rejected_invalid: usize,
    /// Candidates that produced a design point
    pub feasible: usize,
}

impl EnumerationStats {
    pub fn merge(&mut self, other: EnumerationStats) {
        self.candidates += other.candidates;
        self.rejected_static += other.rejected_static;
        self.rejected_resolve += other.rejected_resolve;
        self.rejected_operating += other.rejected_operating;
        self.rejected_invalid += other.rejected_invalid;
        self.feasible += other.feasible;
    }

    pub fn rejected(&self) -> usize {
        self.rejected_static + self.rejected_resolve + self.rejected_operating + self.rejected_invalid
    }
}

/// Drives an [`Evaluator`] over its whole choice space.
#[derive(Debug, Clone, Copy)]
pub struct Enumerator<'c> {
    config: &'c SearchConfig,
}

impl<'c> Enumerator<'c> {
    pub fn new(config: &'c SearchConfig) -> Self {
        Self { config }
    }

    /// Fresh loss-convention pruning frontier populated from `evaluator`.
    pub fn frontier<E: Evaluator>(&self, evaluator: &E) -> (ParetoFrontier, EnumerationStats) {
        let mut frontier = ParetoFrontier::new(Convention::Loss);
        let stats = self.run(evaluator, &mut frontier);
        (frontier, stats)
    }

    /// Evaluate every choice and insert feasible designs into `frontier`.
    pub fn run<E: Evaluator>(&self, evaluator: &E, frontier: &mut ParetoFrontier) -> EnumerationStats {
        let space = ChoiceSpace::new(evaluator.choice_dimensions());

        #[cfg(feature = "desktop")]
        let stats = if self.config.parallel {
            self.run_parallel(evaluator, space, frontier)
        } else {
            self.run_sequential(evaluator, space, frontier)
        };
        #[cfg(not(feature = "desktop"))]
        let stats = self.run_sequential(evaluator, space, frontier);

        debug!(
            evaluator = evaluator.name(),
            candidates = stats.candidates,
            rejected_static = stats.rejected_static,
            rejected_resolve = stats.rejected_resolve,
            rejected_operating = stats.rejected_operating,
            feasible = stats.feasible,
            frontier = frontier.len(),
            "enumeration finished"
        );
        stats
    }

    fn run_sequential<E: Evaluator>(
        &self,
        evaluator: &E,
        space: ChoiceSpace,
        frontier: &mut ParetoFrontier,
    ) -> EnumerationStats {
        let mut stats = EnumerationStats::default();
        for choice in space {
            self.visit(evaluator, &choice, frontier, &mut stats);
        }
        stats
    }

    #[cfg(feature = "desktop")]
    fn run_parallel<E: Evaluator>(
        &self,
        evaluator: &E,
        space: ChoiceSpace,
        frontier: &mut ParetoFrontier,
    ) -> EnumerationStats {
        let convention = frontier.convention();
        let mode = frontier.mode();
        let choices: Vec<Vec<usize>> = space.collect();

        let (local, stats) = choices
            .par_iter()
            .fold(
                || (ParetoFrontier::with_mode(convention, mode), EnumerationStats::default()),
                |(mut local, mut stats), choice| {
                    self.visit(evaluator, choice, &mut local, &mut stats);
                    (local, stats)
                },
            )
            .reduce(
                || (ParetoFrontier::with_mode(convention, mode), EnumerationStats::default()),
                |(mut left, mut left_stats), (right, right_stats)| {
                    for point in right {
                        left.insert(point);
                    }
                    left_stats.merge(right_stats);
                    (left, left_stats)
                },
            );

        for point in local {
            frontier.insert(point);
        }
        stats
    }

    fn visit<E: Evaluator>(
        &self,
        evaluator: &E,
        choice: &[usize],
        frontier: &mut ParetoFrontier,
        stats: &mut EnumerationStats,
    ) {
        stats.candidates += 1;

        let Some(candidate) = evaluator.candidate(choice) else {
            stats.rejected_static += 1;
            return;
        };
        if !evaluator.feasible(&candidate) {
            stats.rejected_static += 1;
            return;
        }

        let candidate = match evaluator.resolve(candidate) {
            Ok(candidate) => candidate,
            Err(infeasible) => {
                trace!(evaluator = evaluator.name(), ?choice, %infeasible, "resolve failed");
                stats.rejected_resolve += 1;
                return;
            }
        };

        let loss = match self
            .config
            .grid
            .weighted_loss(self.config.normalization, |op| evaluator.evaluate(&candidate, op))
        {
            Ok(loss) => loss,
            Err(infeasible) => {
                trace!(evaluator = evaluator.name(), ?choice, %infeasible, "operating point rejected");
                stats.rejected_operating += 1;
                return;
            }
        };

        let props = evaluator.static_properties(&candidate);
        match DesignPoint::new(loss, props.volume, props.cost, evaluator.tag(&candidate)) {
            Ok(point) => {
                stats.feasible += 1;
                frontier.insert(point);
            }
            Err(err) => {
                warn!(evaluator = evaluator.name(), ?choice, %err, "evaluator produced invalid objectives");
                stats.rejected_invalid += 1;
            }
        }
    }
}
