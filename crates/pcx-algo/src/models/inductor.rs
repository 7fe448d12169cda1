//! Gapped-core inductor design.
//!
//! For a target inductance `L` the required turn count grows with the air
//! gap `g`:
//!
//! ```text
//! R_core = l_e / (μ0 · μr · A)        R_gap(g) = g / (μ0 · A)
//! N(g)   = sqrt(L · (R_core + R_gap(g)))
//! N_max  = floor(window · fill / wire_area)
//! ```
//!
//! The gap is not enumerated. [`InductorEvaluator::resolve`] bisects for the
//! largest gap whose turn count still fits the window, which minimises the
//! flux density, then rounds the turn count up and checks saturation:
//! `B_pk = L · I_pk / (N · A) ≤ B_sat`.
//!
//! Loss at an operating point is winding copper loss with the RMS ripple
//! included plus Steinmetz core loss `k · f^α · B_ac^β · V_core`.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::evaluator::{Evaluator, Infeasible, StaticProperties};
use crate::grid::OperatingPoint;
use crate::solver::bisect_boundary;

const MU_0: f64 = 4.0e-7 * std::f64::consts::PI;

/// Upper bound of the gap search as a fraction of the magnetic path length.
const MAX_GAP_FRACTION: f64 = 0.1;

fn default_available() -> bool {
    true
}

/// Catalogue entry for a magnetic core (SI units unless noted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagneticCore {
    pub name: String,
    /// Effective cross-section
    pub area_m2: f64,
    /// Effective magnetic path length
    pub path_length_m: f64,
    pub window_area_m2: f64,
    pub relative_permeability: f64,
    pub saturation_t: f64,
    /// Steinmetz coefficient, W/m³
    pub steinmetz_k: f64,
    pub steinmetz_alpha: f64,
    pub steinmetz_beta: f64,
    pub cost: f64,
    /// Liters, core plus winding envelope
    pub volume: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl MagneticCore {
    fn core_reluctance(&self) -> f64 {
        self.path_length_m / (MU_0 * self.relative_permeability * self.area_m2)
    }

    fn gap_reluctance(&self, gap_m: f64) -> f64 {
        gap_m / (MU_0 * self.area_m2)
    }

    fn material_volume_m3(&self) -> f64 {
        self.area_m2 * self.path_length_m
    }

    /// Approximate mean length of one turn.
    fn mean_turn_length_m(&self) -> f64 {
        4.0 * self.area_m2.sqrt()
    }
}

/// Catalogue entry for a winding conductor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub name: String,
    pub area_m2: f64,
    pub resistance_per_m: f64,
    pub cost_per_m: f64,
}

/// Electrical duty of one module's inductor at full load and nominal input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InductorDuty {
    pub inductance_h: f64,
    /// Voltage that sets the ripple
    pub voltage_v: f64,
    pub current_a: f64,
    pub frequency_hz: f64,
    /// Window share available to copper
    pub fill_factor: f64,
}

impl InductorDuty {
    /// Worst-case (50 % duty) peak-to-peak ripple.
    fn ripple_a(&self, voltage_v: f64) -> f64 {
        voltage_v / (4.0 * self.frequency_hz * self.inductance_h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InductorCandidate {
    pub core: usize,
    pub wire: usize,
    /// Filled in by [`InductorEvaluator::resolve`]
    pub gap_m: f64,
    pub turns: u32,
}

/// Enumerates core × wire for one inductor duty.
pub struct InductorEvaluator<'a> {
    cores: &'a [MagneticCore],
    wires: &'a [Wire],
    duty: InductorDuty,
    config: &'a SearchConfig,
}

impl<'a> InductorEvaluator<'a> {
    pub fn new(
        cores: &'a [MagneticCore],
        wires: &'a [Wire],
        duty: InductorDuty,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            cores,
            wires,
            duty,
            config,
        }
    }

    fn required_turns(&self, core: &MagneticCore, gap_m: f64) -> f64 {
        (self.duty.inductance_h * (core.core_reluctance() + core.gap_reluctance(gap_m))).sqrt()
    }

    fn max_turns(&self, core: &MagneticCore, wire: &Wire) -> u32 {
        (core.window_area_m2 * self.duty.fill_factor / wire.area_m2).floor() as u32
    }

    fn flux_density(&self, core: &MagneticCore, turns: u32, current_a: f64) -> f64 {
        self.duty.inductance_h * current_a / (turns as f64 * core.area_m2)
    }

    fn winding_length_m(&self, candidate: &InductorCandidate) -> f64 {
        candidate.turns as f64 * self.cores[candidate.core].mean_turn_length_m()
    }
}

impl Evaluator for InductorEvaluator<'_> {
    type Candidate = InductorCandidate;

    fn name(&self) -> &str {
        "inductor"
    }

    fn choice_dimensions(&self) -> Vec<usize> {
        vec![self.cores.len(), self.wires.len()]
    }

    fn candidate(&self, choice: &[usize]) -> Option<InductorCandidate> {
        let (&core, &wire) = (choice.first()?, choice.get(1)?);
        (core < self.cores.len() && wire < self.wires.len()).then_some(InductorCandidate {
            core,
            wire,
            gap_m: 0.0,
            turns: 0,
        })
    }

    fn feasible(&self, candidate: &InductorCandidate) -> bool {
        let core = &self.cores[candidate.core];
        let wire = &self.wires[candidate.wire];
        core.available && wire.area_m2 > 0.0 && self.max_turns(core, wire) >= 1
    }

    fn resolve(&self, candidate: InductorCandidate) -> Result<InductorCandidate, Infeasible> {
        let core = &self.cores[candidate.core];
        let wire = &self.wires[candidate.wire];
        let max_turns = self.max_turns(core, wire);

        let gap = bisect_boundary(
            0.0,
            MAX_GAP_FRACTION * core.path_length_m,
            self.config.bisection_tolerance * core.path_length_m,
            self.config.max_bisection_iterations,
            |g| self.required_turns(core, g) <= max_turns as f64,
        )
        .ok_or_else(|| {
            Infeasible::new(format!("{} turns exceed the {} window", wire.name, core.name))
        })?;

        let turns = self.required_turns(core, gap).ceil().max(1.0) as u32;
        if turns > max_turns {
            return Err(Infeasible::new(format!("{turns} turns exceed limit {max_turns}")));
        }

        let peak = self.duty.current_a + 0.5 * self.duty.ripple_a(self.duty.voltage_v);
        let b_peak = self.flux_density(core, turns, peak);
        if b_peak > core.saturation_t {
            return Err(Infeasible::new(format!(
                "{} saturates at {b_peak:.3} T",
                core.name
            )));
        }

        Ok(InductorCandidate {
            gap_m: gap,
            turns,
            ..candidate
        })
    }

    fn evaluate(&self, candidate: &InductorCandidate, op: &OperatingPoint) -> Result<f64, Infeasible> {
        let core = &self.cores[candidate.core];
        let wire = &self.wires[candidate.wire];

        let current = self.duty.current_a * op.load_fraction;
        let ripple = self.duty.ripple_a(self.duty.voltage_v * op.input_scale);

        let b_peak = self.flux_density(core, candidate.turns, current + 0.5 * ripple);
        if b_peak > core.saturation_t {
            return Err(Infeasible::new(format!(
                "{} saturates at {b_peak:.3} T",
                core.name
            )));
        }

        let rms_squared = current * current + ripple * ripple / 12.0;
        let copper = rms_squared * wire.resistance_per_m * self.winding_length_m(candidate);

        let b_ac = self.flux_density(core, candidate.turns, 0.5 * ripple);
        let core_loss = core.steinmetz_k
            * self.duty.frequency_hz.powf(core.steinmetz_alpha)
            * b_ac.powf(core.steinmetz_beta)
            * core.material_volume_m3();

        Ok(copper + core_loss)
    }

    fn static_properties(&self, candidate: &InductorCandidate) -> StaticProperties {
        let core = &self.cores[candidate.core];
        let wire = &self.wires[candidate.wire];
        StaticProperties::new(
            core.cost + wire.cost_per_m * self.winding_length_m(candidate),
            core.volume,
        )
    }

    fn tag(&self, candidate: &InductorCandidate) -> Vec<String> {
        vec![
            self.cores[candidate.core].name.clone(),
            self.wires[candidate.wire].name.clone(),
            format!("turns={}", candidate.turns),
            format!("gap={:.3}mm", candidate.gap_m * 1e3),
        ]
    }
}
