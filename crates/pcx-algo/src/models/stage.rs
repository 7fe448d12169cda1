//! A converter stage built from paralleled bridge/inductor modules.
//!
//! For every module count and switching frequency the stage runs one bridge
//! search and one inductor search, composes the two loss frontiers into a
//! module frontier and lifts it to a stage efficiency frontier:
//!
//! ```text
//! modules n, frequency f:
//!     bridge frontier  (loss) ─┐
//!                              ├─ combine_series ─► scale_modules(n, P) ─► stage frontier
//!     inductor frontier (loss)─┘
//! ```

use pcx_core::{Convention, ParetoFrontier, PcxError, PcxResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bridge::{BridgeDuty, BridgeEvaluator, SwitchDevice};
use super::inductor::{InductorDuty, InductorEvaluator, MagneticCore, Wire};
use crate::combine::{combine_series, scale_modules};
use crate::config::SearchConfig;
use crate::enumerate::Enumerator;
use crate::optimizer::{Stage, SweepPoint};

/// A voltage given directly or by the name of a sweep variable or an
/// upstream stage's published quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoltageRef {
    Fixed(f64),
    Bound(String),
}

impl VoltageRef {
    pub fn resolve(&self, point: &SweepPoint) -> PcxResult<f64> {
        let value = match self {
            VoltageRef::Fixed(v) => *v,
            VoltageRef::Bound(name) => point.require(name)?,
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(PcxError::Config(format!("voltage {value} must be positive")));
        }
        Ok(value)
    }
}

fn default_max_parallel() -> usize {
    4
}

fn default_ripple_fraction() -> f64 {
    0.3
}

fn default_fill_factor() -> f64 {
    0.4
}

fn default_module_counts() -> Vec<usize> {
    vec![1]
}

/// Stage model with its own component catalogues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterStage {
    pub name: String,
    pub input_voltage: VoltageRef,
    pub output_voltage: VoltageRef,
    /// Power processed by the whole stage; studies fill it from their total
    #[serde(default)]
    pub power_w: Option<f64>,
    #[serde(default = "default_module_counts")]
    pub module_counts: Vec<usize>,
    pub frequencies_hz: Vec<f64>,
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Peak-to-peak inductor ripple relative to the full-load current
    #[serde(default = "default_ripple_fraction")]
    pub ripple_fraction: f64,
    /// Fixed inductance; derived from the ripple target when absent
    #[serde(default)]
    pub inductance_h: Option<f64>,
    #[serde(default = "default_fill_factor")]
    pub fill_factor: f64,
    pub devices: Vec<SwitchDevice>,
    pub cores: Vec<MagneticCore>,
    pub wires: Vec<Wire>,
}

impl ConverterStage {
    /// Quantity name under which the output voltage is published.
    pub fn output_binding(&self) -> String {
        format!("{}.output_voltage", self.name)
    }

    pub fn validate(&self) -> PcxResult<()> {
        let fail = |msg: String| Err(PcxError::Config(format!("stage '{}': {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(PcxError::Config("stage name is empty".into()));
        }
        match self.power_w {
            Some(p) if p.is_finite() && p > 0.0 => {}
            Some(p) => return fail(format!("power {p} must be positive")),
            None => return fail("power is not set".into()),
        }
        if self.module_counts.is_empty() || self.module_counts.contains(&0) {
            return fail("module counts must be non-empty and at least 1".into());
        }
        if self.frequencies_hz.is_empty()
            || self.frequencies_hz.iter().any(|f| !f.is_finite() || *f <= 0.0)
        {
            return fail("frequencies must be non-empty and positive".into());
        }
        if self.max_parallel == 0 {
            return fail("max_parallel must be at least 1".into());
        }
        if !(self.ripple_fraction > 0.0 && self.ripple_fraction < 2.0) {
            return fail(format!("ripple fraction {} outside (0, 2)", self.ripple_fraction));
        }
        if let Some(l) = self.inductance_h {
            if !l.is_finite() || l <= 0.0 {
                return fail(format!("inductance {l} must be positive"));
            }
        }
        if !(self.fill_factor > 0.0 && self.fill_factor <= 1.0) {
            return fail(format!("fill factor {} outside (0, 1]", self.fill_factor));
        }
        if self.devices.is_empty() || self.cores.is_empty() || self.wires.is_empty() {
            return fail("device, core and wire catalogues must not be empty".into());
        }
        Ok(())
    }

    /// Loss frontier of one module, or `None` when either component search
    /// comes back empty.
    fn module_frontier(
        &self,
        config: &SearchConfig,
        input_v: f64,
        current_a: f64,
        frequency_hz: f64,
    ) -> PcxResult<Option<ParetoFrontier>> {
        let enumerator = Enumerator::new(config);
        let solver = config.bisection();

        let bridge = BridgeEvaluator::new(
            &self.devices,
            BridgeDuty {
                voltage_v: input_v,
                current_a,
                peak_current_a: current_a * (1.0 + 0.5 * self.ripple_fraction),
                frequency_hz,
            },
            self.max_parallel,
            config,
            &solver,
        );
        let (switches, bridge_stats) = enumerator.frontier(&bridge);
        if switches.is_empty() {
            debug!(stage = %self.name, frequency_hz, rejected = bridge_stats.rejected(), "no feasible bridge");
            return Ok(None);
        }

        let inductance = self
            .inductance_h
            .unwrap_or_else(|| input_v / (4.0 * frequency_hz * self.ripple_fraction * current_a));
        let inductor = InductorEvaluator::new(
            &self.cores,
            &self.wires,
            InductorDuty {
                inductance_h: inductance,
                voltage_v: input_v,
                current_a,
                frequency_hz,
                fill_factor: self.fill_factor,
            },
            config,
        );
        let (magnetics, inductor_stats) = enumerator.frontier(&inductor);
        if magnetics.is_empty() {
            debug!(stage = %self.name, frequency_hz, rejected = inductor_stats.rejected(), "no feasible inductor");
            return Ok(None);
        }

        combine_series(&switches, &magnetics).map(Some)
    }
}

impl Stage for ConverterStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn frontier(&self, point: &SweepPoint, config: &SearchConfig) -> PcxResult<ParetoFrontier> {
        self.validate()?;
        let input_v = self.input_voltage.resolve(point)?;
        let output_v = self.output_voltage.resolve(point)?;
        let power = self
            .power_w
            .ok_or_else(|| PcxError::Config(format!("stage '{}': power is not set", self.name)))?;

        let mut stage_frontier = ParetoFrontier::new(Convention::Efficiency);
        for &modules in &self.module_counts {
            let current_a = power / modules as f64 / output_v;
            for &frequency_hz in &self.frequencies_hz {
                let Some(module) = self.module_frontier(config, input_v, current_a, frequency_hz)?
                else {
                    continue;
                };

                let mut scaled = ParetoFrontier::new(Convention::Efficiency);
                scale_modules(&module, modules, power, &mut scaled)?;
                let prefix = [
                    self.name.clone(),
                    format!("modules={modules}"),
                    format!("f={}kHz", frequency_hz / 1e3),
                ];
                for design in scaled {
                    stage_frontier.insert(design.with_tag_prefix(prefix.iter().cloned()));
                }
            }
        }

        debug!(stage = %self.name, %point, input_v, output_v, designs = stage_frontier.len(), "stage frontier");
        Ok(stage_frontier)
    }

    fn publish(&self, point: &SweepPoint) -> Vec<(String, f64)> {
        match self.output_voltage.resolve(point) {
            Ok(v) => vec![(self.output_binding(), v)],
            Err(_) => Vec::new(),
        }
    }
}
