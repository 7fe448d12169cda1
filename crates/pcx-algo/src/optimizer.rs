//! Outer-sweep orchestration across pipeline stages.
//!
//! Some parameters constrain several stages at once: an intermediate bus
//! voltage is both the output of the upstream stage and the input of the
//! downstream one. Such *sweep variables* are iterated here, outside any
//! single stage's enumeration.
//!
//! ```text
//! for each combination of sweep values (declared order, last fastest):
//!     for each stage in pipeline order:
//!         frontier_k = stage.frontier(point)      ── empty? skip combination
//!         point += stage.publish(point)           (derived quantities)
//!     composite = frontier_1 ⊗ frontier_2 ⊗ ...
//!     global  ∪= composite   (pruning)
//!     archive ++= composite  (archival)
//! ```
//!
//! The loop is finite and always terminates; adaptivity lives only in the
//! evaluators' local searches.

use std::fmt;
use std::time::{Duration, Instant};

use pcx_core::{Convention, ParetoFrontier, PcxError, PcxResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combine::combine_chain;
use crate::config::SearchConfig;
use crate::enumerate::ChoiceSpace;

/// A parameter shared by several stages and swept outside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepVariable {
    pub name: String,
    pub values: Vec<f64>,
}

impl SweepVariable {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Named values bound for one sweep combination, in binding order.
///
/// Holds the sweep variables themselves plus any quantities published by
/// upstream stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepPoint {
    bindings: Vec<(String, f64)>,
}

impl SweepPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing an existing binding of the same name.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.bindings.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Like [`get`](Self::get) but a missing name is a configuration error.
    pub fn require(&self, name: &str) -> PcxResult<f64> {
        self.get(name)
            .ok_or_else(|| PcxError::Config(format!("'{name}' is not bound at this sweep point")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.bindings.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(n, v)| format!("{n}={v}")).collect();
        f.write_str(&parts.join(", "))
    }
}

/// One pipeline segment optimized independently before composition.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    /// Efficiency-convention frontier of this stage at one sweep point.
    /// An empty frontier means no feasible design, not an error.
    fn frontier(&self, point: &SweepPoint, config: &SearchConfig) -> PcxResult<ParetoFrontier>;

    /// Derived quantities made visible to downstream stages.
    fn publish(&self, _point: &SweepPoint) -> Vec<(String, f64)> {
        Vec::new()
    }
}

/// Result of a full sweep.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Non-dominated composite designs across all combinations
    pub frontier: ParetoFrontier,
    /// Every composite-frontier point of every combination
    pub archive: ParetoFrontier,
    pub combinations: usize,
    /// Combinations that contributed no composite design
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Nested sweep over shared variables with per-stage search and series
/// composition.
pub struct Optimizer {
    config: SearchConfig,
    sweeps: Vec<SweepVariable>,
    stages: Vec<Box<dyn Stage>>,
}

impl Optimizer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            sweeps: Vec::new(),
            stages: Vec::new(),
        }
    }

    pub fn with_sweep(mut self, sweep: SweepVariable) -> Self {
        self.sweeps.push(sweep);
        self
    }

    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Number of sweep combinations that [`run`](Self::run) will visit.
    pub fn combination_count(&self) -> usize {
        self.sweeps.iter().map(|s| s.values.len()).product()
    }

    fn validate(&self) -> PcxResult<()> {
        self.config.validate()?;
        if self.stages.is_empty() {
            return Err(PcxError::Config("optimizer has no stages".into()));
        }
        for (i, sweep) in self.sweeps.iter().enumerate() {
            if self.sweeps[..i].iter().any(|s| s.name == sweep.name) {
                return Err(PcxError::Config(format!(
                    "sweep variable '{}' declared twice",
                    sweep.name
                )));
            }
            if let Some(bad) = sweep.values.iter().find(|v| !v.is_finite()) {
                return Err(PcxError::Config(format!(
                    "sweep variable '{}' has non-finite value {bad}",
                    sweep.name
                )));
            }
        }
        Ok(())
    }

    pub fn run(&self) -> PcxResult<OptimizationOutcome> {
        self.validate()?;
        let start = Instant::now();

        let mut frontier = ParetoFrontier::new(Convention::Efficiency);
        let mut archive = ParetoFrontier::archival(Convention::Efficiency);
        let mut combinations = 0;
        let mut skipped = 0;

        let dimensions = self.sweeps.iter().map(|s| s.values.len()).collect();
        for choice in ChoiceSpace::new(dimensions) {
            combinations += 1;

            let mut point = SweepPoint::new();
            let mut sweep_tag = Vec::with_capacity(self.sweeps.len());
            for (sweep, &idx) in self.sweeps.iter().zip(&choice) {
                let value = sweep.values[idx];
                point.bind(sweep.name.clone(), value);
                sweep_tag.push(format!("{}={}", sweep.name, value));
            }

            let Some(composite) = self.compose(&mut point)? else {
                skipped += 1;
                continue;
            };
            debug!(%point, composite = composite.len(), "combination composed");

            for design in composite {
                let design = design.with_tag_prefix(sweep_tag.iter().cloned());
                archive.insert(design.clone());
                frontier.insert(design);
            }
        }

        let elapsed = start.elapsed();
        info!(
            stages = self.stages.len(),
            combinations,
            skipped,
            frontier = frontier.len(),
            archive = archive.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "sweep finished"
        );

        Ok(OptimizationOutcome {
            frontier,
            archive,
            combinations,
            skipped,
            elapsed,
        })
    }

    /// Stage frontiers for one combination, composed in pipeline order.
    /// `None` when some stage has no feasible design or no composite
    /// survives the composition.
    fn compose(&self, point: &mut SweepPoint) -> PcxResult<Option<ParetoFrontier>> {
        let mut stage_frontiers = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let stage_frontier = stage.frontier(point, &self.config)?;
            if stage_frontier.convention() != Convention::Efficiency {
                return Err(PcxError::ConventionMismatch {
                    expected: Convention::Efficiency,
                    found: stage_frontier.convention(),
                });
            }
            if stage_frontier.is_empty() {
                debug!(stage = stage.name(), %point, "no feasible design, skipping combination");
                return Ok(None);
            }
            for (name, value) in stage.publish(point) {
                point.bind(name, value);
            }
            stage_frontiers.push(stage_frontier);
        }
        let composite = combine_chain(stage_frontiers)?;
        if composite.as_ref().is_some_and(ParetoFrontier::is_empty) {
            debug!(%point, "every composite dropped, skipping combination");
            return Ok(None);
        }
        Ok(composite)
    }
}
