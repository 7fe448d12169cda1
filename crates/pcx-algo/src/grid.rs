//! Operating-point grid and weighted composite loss.
//!
//! A candidate is evaluated at every `(input level, load level)` pair. Each
//! load level carries a weight approximating the fraction of operating time
//! spent there; the weighted sum is the scalar loss used for Pareto
//! comparison.
//!
//! ```text
//!            Σ_i Σ_l  w_l · P_loss(input_i, load_l)
//! P_w  =  ───────────────────────────────────────────
//!                    N_in · (Σ_l w_l)?
//! ```
//!
//! `N_in` is the number of input levels when more than one is declared and 1
//! otherwise. Whether the weight sum is divided out is the
//! [`WeightNormalization`] policy.

use pcx_core::{PcxError, PcxResult};
use serde::{Deserialize, Serialize};

use crate::evaluator::Infeasible;

/// One (input-condition, load-fraction) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Multiplier on the nominal input condition (e.g. input voltage)
    pub input_scale: f64,
    /// Fraction of rated power
    pub load_fraction: f64,
}

/// A load level and its weight in the composite figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadLevel {
    pub fraction: f64,
    pub weight: f64,
}

/// How load weights are normalized in the composite loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightNormalization {
    /// Use weights as sampled; only the input-level count is divided out
    #[default]
    AsSampled,
    /// Additionally divide by the sum of load weights
    Renormalized,
}

/// Fixed grid of operating points at which every candidate is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingGrid {
    pub input_levels: Vec<f64>,
    pub load_levels: Vec<LoadLevel>,
}

impl Default for OperatingGrid {
    fn default() -> Self {
        const LOADS: [(f64, f64); 7] = [
            (0.05, 0.01),
            (0.10, 0.04),
            (0.20, 0.05),
            (0.30, 0.12),
            (0.50, 0.21),
            (0.75, 0.48),
            (1.00, 0.05),
        ];
        Self {
            input_levels: vec![0.9, 0.95, 1.0, 1.05, 1.1],
            load_levels: LOADS
                .iter()
                .map(|&(fraction, weight)| LoadLevel { fraction, weight })
                .collect(),
        }
    }
}

impl OperatingGrid {
    /// Grid evaluated at the nominal input only.
    pub fn fixed_input(load_levels: Vec<LoadLevel>) -> Self {
        Self {
            input_levels: vec![1.0],
            load_levels,
        }
    }

    pub fn validate(&self) -> PcxResult<()> {
        if self.input_levels.is_empty() {
            return Err(PcxError::Config("operating grid has no input levels".into()));
        }
        if self.load_levels.is_empty() {
            return Err(PcxError::Config("operating grid has no load levels".into()));
        }
        if let Some(bad) = self
            .input_levels
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return Err(PcxError::Config(format!("input level {bad} must be positive")));
        }
        for level in &self.load_levels {
            if !level.fraction.is_finite() || level.fraction <= 0.0 {
                return Err(PcxError::Config(format!(
                    "load fraction {} must be positive",
                    level.fraction
                )));
            }
            if !level.weight.is_finite() || level.weight < 0.0 {
                return Err(PcxError::Config(format!(
                    "load weight {} must be non-negative",
                    level.weight
                )));
            }
        }
        if self.weight_sum() <= 0.0 {
            return Err(PcxError::Config("load weights sum to zero".into()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.input_levels.len() * self.load_levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn weight_sum(&self) -> f64 {
        self.load_levels.iter().map(|l| l.weight).sum()
    }

    pub fn max_input_scale(&self) -> f64 {
        self.input_levels.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_load_fraction(&self) -> f64 {
        self.load_levels.iter().map(|l| l.fraction).fold(0.0, f64::max)
    }

    /// Every operating point with its load weight, input level outermost.
    pub fn points(&self) -> impl Iterator<Item = (OperatingPoint, f64)> + '_ {
        self.input_levels.iter().flat_map(move |&input_scale| {
            self.load_levels.iter().map(move |level| {
                (
                    OperatingPoint {
                        input_scale,
                        load_fraction: level.fraction,
                    },
                    level.weight,
                )
            })
        })
    }

    /// Weighted composite loss over the whole grid.
    ///
    /// Stops at the first infeasible operating point: infeasibility anywhere
    /// rejects the candidate. Zero-weight points are still evaluated so their
    /// feasibility checks apply.
    pub fn weighted_loss<F>(
        &self,
        normalization: WeightNormalization,
        mut evaluate: F,
    ) -> Result<f64, Infeasible>
    where
        F: FnMut(&OperatingPoint) -> Result<f64, Infeasible>,
    {
        let mut total = 0.0;
        for (point, weight) in self.points() {
            let loss = evaluate(&point)?;
            if !loss.is_finite() || loss < 0.0 {
                return Err(Infeasible::new(format!(
                    "loss {loss} at input x{} load {}",
                    point.input_scale, point.load_fraction
                )));
            }
            total += weight * loss;
        }

        let inputs = if self.input_levels.len() > 1 {
            self.input_levels.len() as f64
        } else {
            1.0
        };
        let mut normalized = total / inputs;
        if normalization == WeightNormalization::Renormalized {
            normalized /= self.weight_sum();
        }
        Ok(normalized)
    }
}
