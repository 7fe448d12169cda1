//! Half-bridge switch selection.
//!
//! Each of the two switch positions is populated with `n` identical devices
//! in parallel. Per device, at junction temperature `T`:
//!
//! ```text
//! i        = I_load / n
//! R_on(T)  = R_on,25 · (1 + tempco · (T − 25))
//! P_dev(T) = ½ · i² · R_on(T)  +  f · E_sw · (V / V_rated) · (i / I_rated)
//! ```
//!
//! The junction temperature is the fixed point `T = T_amb + R_th · P_dev(T)`,
//! found on `[T_amb, T_j,max]` with the injected [`RootFinder`]. No root in
//! that bracket means the device overheats at this operating point.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::evaluator::{Evaluator, Infeasible, StaticProperties};
use crate::grid::OperatingPoint;
use crate::solver::RootFinder;

fn default_tempco() -> f64 {
    0.006
}

fn default_max_junction() -> f64 {
    150.0
}

fn default_available() -> bool {
    true
}

/// Catalogue entry for a power semiconductor switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchDevice {
    pub name: String,
    pub rated_voltage_v: f64,
    pub rated_current_a: f64,
    /// On-resistance at 25 °C
    pub on_resistance_ohm: f64,
    /// Relative increase of on-resistance per kelvin
    #[serde(default = "default_tempco")]
    pub resistance_tempco: f64,
    /// Turn-on plus turn-off energy at rated voltage and current
    pub switching_energy_j: f64,
    /// Junction to ambient, including the heatsink share
    pub thermal_resistance_k_per_w: f64,
    #[serde(default = "default_max_junction")]
    pub max_junction_c: f64,
    pub cost: f64,
    /// Liters, including the heatsink share
    pub volume: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl SwitchDevice {
    fn on_resistance_at(&self, junction_c: f64) -> f64 {
        self.on_resistance_ohm * (1.0 + self.resistance_tempco * (junction_c - 25.0))
    }

    /// Loss of one device carrying `current_a` while blocking `voltage_v`.
    fn loss_at(&self, voltage_v: f64, current_a: f64, frequency_hz: f64, junction_c: f64) -> f64 {
        let conduction = 0.5 * current_a * current_a * self.on_resistance_at(junction_c);
        let switching = frequency_hz
            * self.switching_energy_j
            * (voltage_v / self.rated_voltage_v)
            * (current_a / self.rated_current_a);
        conduction + switching
    }
}

/// Electrical duty of one module's bridge at full load and nominal input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeDuty {
    pub voltage_v: f64,
    /// Average current at full load
    pub current_a: f64,
    /// Worst-case peak current, including ripple
    pub peak_current_a: f64,
    pub frequency_hz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeCandidate {
    pub device: usize,
    pub parallel: usize,
}

/// Enumerates device × parallel count for one bridge duty.
pub struct BridgeEvaluator<'a, R> {
    devices: &'a [SwitchDevice],
    duty: BridgeDuty,
    max_parallel: usize,
    config: &'a SearchConfig,
    solver: &'a R,
}

impl<'a, R: RootFinder> BridgeEvaluator<'a, R> {
    pub fn new(
        devices: &'a [SwitchDevice],
        duty: BridgeDuty,
        max_parallel: usize,
        config: &'a SearchConfig,
        solver: &'a R,
    ) -> Self {
        Self {
            devices,
            duty,
            max_parallel,
            config,
            solver,
        }
    }

    /// Steady-state junction temperature of one device.
    fn junction_temperature(
        &self,
        device: &SwitchDevice,
        voltage_v: f64,
        current_a: f64,
    ) -> Result<f64, Infeasible> {
        let ambient = self.config.ambient_c;
        let balance = |t: f64| {
            t - ambient
                - device.thermal_resistance_k_per_w
                    * device.loss_at(voltage_v, current_a, self.duty.frequency_hz, t)
        };
        self.solver
            .solve(&balance, ambient, device.max_junction_c)
            .map_err(|err| {
                Infeasible::new(format!("{} thermal limit: {}", device.name, err.reason))
            })
    }
}

impl<R: RootFinder> Evaluator for BridgeEvaluator<'_, R> {
    type Candidate = BridgeCandidate;

    fn name(&self) -> &str {
        "bridge"
    }

    fn choice_dimensions(&self) -> Vec<usize> {
        vec![self.devices.len(), self.max_parallel]
    }

    fn candidate(&self, choice: &[usize]) -> Option<BridgeCandidate> {
        let (&device, &slot) = (choice.first()?, choice.get(1)?);
        if device >= self.devices.len() || slot >= self.max_parallel {
            return None;
        }
        Some(BridgeCandidate {
            device,
            parallel: slot + 1,
        })
    }

    fn feasible(&self, candidate: &BridgeCandidate) -> bool {
        let device = &self.devices[candidate.device];
        if !device.available {
            return false;
        }
        let worst_voltage = self.duty.voltage_v * self.config.grid.max_input_scale();
        if worst_voltage * (1.0 + self.config.voltage_margin) > device.rated_voltage_v {
            return false;
        }
        let capacity = candidate.parallel as f64 * device.rated_current_a;
        if self.duty.peak_current_a * (1.0 + self.config.current_margin) > capacity {
            return false;
        }
        match self.config.excess_capacity_limit {
            Some(limit) => capacity <= limit * self.duty.peak_current_a,
            None => true,
        }
    }

    fn evaluate(&self, candidate: &BridgeCandidate, op: &OperatingPoint) -> Result<f64, Infeasible> {
        let device = &self.devices[candidate.device];
        let n = candidate.parallel as f64;
        let voltage = self.duty.voltage_v * op.input_scale;
        let per_device = self.duty.current_a * op.load_fraction / n;

        let junction = self.junction_temperature(device, voltage, per_device)?;
        let loss = device.loss_at(voltage, per_device, self.duty.frequency_hz, junction);
        Ok(2.0 * n * loss)
    }

    fn static_properties(&self, candidate: &BridgeCandidate) -> StaticProperties {
        let device = &self.devices[candidate.device];
        let count = 2.0 * candidate.parallel as f64;
        StaticProperties::new(device.cost * count, device.volume * count)
    }

    fn tag(&self, candidate: &BridgeCandidate) -> Vec<String> {
        vec![
            self.devices[candidate.device].name.clone(),
            format!("parallel={}", candidate.parallel),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::Enumerator;
    use crate::grid::{LoadLevel, OperatingGrid};
    use crate::solver::Bisection;

    fn device(name: &str, rated_voltage_v: f64, rated_current_a: f64) -> SwitchDevice {
        SwitchDevice {
            name: name.into(),
            rated_voltage_v,
            rated_current_a,
            on_resistance_ohm: 0.05,
            resistance_tempco: 0.0,
            switching_energy_j: 100e-6,
            thermal_resistance_k_per_w: 1.0,
            max_junction_c: 150.0,
            cost: 5.0,
            volume: 0.002,
            available: true,
        }
    }

    fn full_load_config() -> SearchConfig {
        SearchConfig {
            grid: OperatingGrid::fixed_input(vec![LoadLevel {
                fraction: 1.0,
                weight: 1.0,
            }]),
            parallel: false,
            ..SearchConfig::default()
        }
    }

    const DUTY: BridgeDuty = BridgeDuty {
        voltage_v: 400.0,
        current_a: 10.0,
        peak_current_a: 10.0,
        frequency_hz: 50e3,
    };

    const FULL_LOAD: OperatingPoint = OperatingPoint {
        input_scale: 1.0,
        load_fraction: 1.0,
    };

    #[test]
    fn test_loss_matches_hand_calculation() {
        let devices = [device("sic650", 650.0, 30.0)];
        let config = full_load_config();
        let solver = Bisection::default();
        let bridge = BridgeEvaluator::new(&devices, DUTY, 1, &config, &solver);

        let single = BridgeCandidate { device: 0, parallel: 1 };
        let loss = bridge.evaluate(&single, &FULL_LOAD).unwrap();
        let conduction = 0.5 * 100.0 * 0.05;
        let switching = 50e3 * 100e-6 * (400.0 / 650.0) * (10.0 / 30.0);
        assert!((loss - 2.0 * (conduction + switching)).abs() < 1e-9);
        assert_eq!(bridge.static_properties(&single).cost, 10.0);
        assert_eq!(bridge.tag(&single), ["sic650", "parallel=1"]);
    }

    #[test]
    fn test_static_gates() {
        let mut unavailable = device("gone", 650.0, 30.0);
        unavailable.available = false;
        let devices = [
            device("low_voltage", 400.0, 30.0),
            device("big", 650.0, 30.0),
            unavailable,
            device("small", 650.0, 5.0),
        ];
        let config = full_load_config();
        let solver = Bisection::default();
        let bridge = BridgeEvaluator::new(&devices, DUTY, 3, &config, &solver);

        let gate = |device, parallel| bridge.feasible(&BridgeCandidate { device, parallel });
        assert!(!gate(0, 1));
        assert!(gate(1, 1));
        // 60 A installed for a 10 A peak exceeds the 4x ceiling
        assert!(!gate(1, 2));
        assert!(!gate(2, 1));
        // 5 A parts need three in parallel for 11 A with margin
        assert!(!gate(3, 2));
        assert!(gate(3, 3));
        assert!(bridge.candidate(&[4, 0]).is_none());
        assert!(bridge.candidate(&[0, 3]).is_none());
    }

    #[test]
    fn test_overheating_is_infeasible() {
        let mut hot = device("hot", 650.0, 30.0);
        hot.thermal_resistance_k_per_w = 100.0;
        let devices = [hot];
        let config = full_load_config();
        let solver = Bisection::default();
        let bridge = BridgeEvaluator::new(&devices, DUTY, 1, &config, &solver);
        let err = bridge
            .evaluate(&BridgeCandidate { device: 0, parallel: 1 }, &FULL_LOAD)
            .unwrap_err();
        assert!(err.reason.contains("thermal limit"));
    }

    #[test]
    fn test_temperature_raises_conduction_loss() {
        let cold = device("cold", 650.0, 30.0);
        let mut warm = cold.clone();
        warm.resistance_tempco = 0.006;
        let devices = [cold, warm];
        let config = full_load_config();
        let solver = Bisection::default();
        let bridge = BridgeEvaluator::new(&devices, DUTY, 1, &config, &solver);

        let base = bridge
            .evaluate(&BridgeCandidate { device: 0, parallel: 1 }, &FULL_LOAD)
            .unwrap();
        let heated = bridge
            .evaluate(&BridgeCandidate { device: 1, parallel: 1 }, &FULL_LOAD)
            .unwrap();
        assert!(heated > base);
    }

    #[test]
    fn test_enumeration_keeps_tradeoffs() {
        let mut cheap = device("cheap", 650.0, 30.0);
        cheap.on_resistance_ohm = 0.2;
        cheap.cost = 2.0;
        let devices = [cheap, device("fast", 650.0, 30.0)];
        let config = full_load_config();
        let solver = Bisection::default();
        let bridge = BridgeEvaluator::new(&devices, DUTY, 1, &config, &solver);

        let (frontier, stats) = Enumerator::new(&config).frontier(&bridge);
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.feasible, 2);
        assert_eq!(frontier.len(), 2);
    }
}
