//! Study files: one TOML document describing a whole optimization.
//!
//! ```toml
//! total_power_w = 1000.0
//! ambient_c = 45.0            # optional, overrides [search]
//!
//! [search]
//! voltage_margin = 0.2
//! normalization = "as-sampled"
//!
//! [[sweep]]
//! name = "v_bus"
//! values = [400.0, 450.0]
//!
//! [[stage]]
//! name = "front"
//! input_voltage = 800.0
//! output_voltage = "v_bus"
//! frequencies_hz = [50000.0]
//! [[stage.devices]]
//! ...
//! ```
//!
//! Stage voltages are numbers or the name of a sweep variable or of an
//! upstream stage's `<stage>.output_voltage`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pcx_algo::models::{ConverterStage, VoltageRef};
use pcx_algo::{Optimizer, SearchConfig, SweepVariable};
use pcx_core::Diagnostics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    /// Power processed by every stage unless the stage sets its own
    pub total_power_w: f64,
    #[serde(default)]
    pub ambient_c: Option<f64>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default, rename = "sweep")]
    pub sweeps: Vec<SweepVariable>,
    #[serde(default, rename = "stage")]
    pub stages: Vec<ConverterStage>,
}

impl Study {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut study: Study = toml::from_str(contents)?;
        study.apply_defaults();
        Ok(study)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading study file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("parsing study file {}", path.display()))
    }

    fn apply_defaults(&mut self) {
        if let Some(ambient) = self.ambient_c {
            self.search.ambient_c = ambient;
        }
        for stage in &mut self.stages {
            stage.power_w.get_or_insert(self.total_power_w);
        }
    }

    pub fn combination_count(&self) -> usize {
        self.sweeps.iter().map(|s| s.values.len()).product()
    }

    /// Every problem that would stop or hollow out a run.
    pub fn diagnose(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();

        if !self.total_power_w.is_finite() || self.total_power_w <= 0.0 {
            diag.add_error(
                "study",
                &format!("total_power_w must be positive, got {}", self.total_power_w),
            );
        }
        if let Err(err) = self.search.validate() {
            diag.add_error("search", &err.to_string());
        }

        let mut bound: HashSet<String> = HashSet::new();
        for sweep in &self.sweeps {
            if !bound.insert(sweep.name.clone()) {
                diag.add_error_with_entity("sweep", "declared twice", &sweep.name);
            }
            if sweep.values.is_empty() {
                diag.add_warning_with_entity("sweep", "no values, nothing will run", &sweep.name);
            }
            if sweep.values.iter().any(|v| !v.is_finite()) {
                diag.add_error_with_entity("sweep", "non-finite value", &sweep.name);
            }
        }

        if self.stages.is_empty() {
            diag.add_error("stage", "study declares no stages");
        }
        let mut stage_names = HashSet::new();
        for stage in &self.stages {
            if !stage_names.insert(stage.name.clone()) {
                diag.add_error_with_entity("stage", "declared twice", &stage.name);
            }
            if let Err(err) = stage.validate() {
                diag.add_error_with_entity("stage", &err.to_string(), &stage.name);
            }
            for (role, voltage) in [
                ("input_voltage", &stage.input_voltage),
                ("output_voltage", &stage.output_voltage),
            ] {
                if let VoltageRef::Bound(name) = voltage {
                    if !bound.contains(name) {
                        diag.add_error_with_entity(
                            "stage",
                            &format!("{role} refers to unbound name '{name}'"),
                            &stage.name,
                        );
                    }
                }
            }
            bound.insert(stage.output_binding());
        }
        diag
    }

    pub fn into_optimizer(self) -> Optimizer {
        let mut optimizer = Optimizer::new(self.search);
        for sweep in self.sweeps {
            optimizer = optimizer.with_sweep(sweep);
        }
        for stage in self.stages {
            optimizer = optimizer.with_stage(stage);
        }
        optimizer
    }
}
