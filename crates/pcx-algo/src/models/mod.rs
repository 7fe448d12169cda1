//! First-order reference models for a DC-DC converter stage.
//!
//! These are concrete [`Evaluator`](crate::Evaluator) and
//! [`Stage`](crate::Stage) implementations used by the CLI and the
//! integration tests. They are deliberately simple; any model with the same
//! trait shape can replace them.

pub mod bridge;
pub mod inductor;
pub mod stage;

pub use bridge::{BridgeCandidate, BridgeDuty, BridgeEvaluator, SwitchDevice};
pub use inductor::{InductorCandidate, InductorDuty, InductorEvaluator, MagneticCore, Wire};
pub use stage::{ConverterStage, VoltageRef};
