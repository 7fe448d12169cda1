//! Immutable search configuration.
//!
//! One [`SearchConfig`] value is built before a search starts (typically from
//! the `[search]` table of a study file) and passed by reference into the
//! enumerator, the stage models and the optimizer.

use pcx_core::{PcxError, PcxResult};
use serde::{Deserialize, Serialize};

use crate::grid::{OperatingGrid, WeightNormalization};
use crate::solver::Bisection;

/// Margins, operating grid and numeric tolerances for a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Required headroom of rated voltage over worst-case applied voltage
    pub voltage_margin: f64,
    /// Required headroom of rated current over worst-case peak current
    pub current_margin: f64,
    /// Reject devices whose total rated current exceeds this multiple of the
    /// required peak current (`None` disables the ceiling)
    pub excess_capacity_limit: Option<f64>,
    /// Ambient temperature for thermal checks (°C)
    pub ambient_c: f64,
    pub grid: OperatingGrid,
    pub normalization: WeightNormalization,
    /// Interval width at which bisection searches stop
    pub bisection_tolerance: f64,
    pub max_bisection_iterations: usize,
    /// Evaluate candidates on the rayon pool when the `desktop` feature is on
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            voltage_margin: 0.2,
            current_margin: 0.1,
            excess_capacity_limit: Some(4.0),
            ambient_c: 40.0,
            grid: OperatingGrid::default(),
            normalization: WeightNormalization::AsSampled,
            bisection_tolerance: 1e-6,
            max_bisection_iterations: 200,
            parallel: true,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> PcxResult<()> {
        for (name, value) in [
            ("voltage_margin", self.voltage_margin),
            ("current_margin", self.current_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PcxError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }
        if let Some(limit) = self.excess_capacity_limit {
            if !limit.is_finite() || limit < 1.0 {
                return Err(PcxError::Config(format!(
                    "excess_capacity_limit must be >= 1, got {limit}"
                )));
            }
        }
        if !self.ambient_c.is_finite() {
            return Err(PcxError::Config("ambient_c must be finite".into()));
        }
        if !self.bisection_tolerance.is_finite() || self.bisection_tolerance <= 0.0 {
            return Err(PcxError::Config(format!(
                "bisection_tolerance must be positive, got {}",
                self.bisection_tolerance
            )));
        }
        if self.max_bisection_iterations == 0 {
            return Err(PcxError::Config(
                "max_bisection_iterations must be at least 1".into(),
            ));
        }
        self.grid.validate()
    }

    /// Root finder configured with this search's tolerances.
    pub fn bisection(&self) -> Bisection {
        Bisection {
            tolerance: self.bisection_tolerance,
            max_iterations: self.max_bisection_iterations,
        }
    }
}
