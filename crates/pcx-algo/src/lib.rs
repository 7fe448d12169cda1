//! # pcx-algo: Design-space search for power converters
//!
//! This crate turns component catalogues into Pareto frontiers of
//! (loss or efficiency, volume, cost) and composes those frontiers across a
//! converter pipeline.
//!
//! ## Architecture
//!
//! | Layer | Role |
//! |-------|------|
//! | [`Evaluator`] | Physics of one component kind: static gate, local search, loss per operating point |
//! | [`Enumerator`] | Walks the discrete choice space of an evaluator and fills a frontier |
//! | [`combine_series`] / [`scale_modules`] | Series composition and module bundling of frontiers |
//! | [`Stage`] | A pipeline segment producing an efficiency frontier per sweep point |
//! | [`Optimizer`] | Outer sweep over shared variables, composition, global and archival frontiers |
//!
//! Loss at a candidate is a weighted sum over the [`OperatingGrid`]; any
//! infeasible operating point discards the candidate. Continuous parameters
//! are found through the injectable [`RootFinder`] or [`bisect_boundary`].
//!
//! ## Example
//!
//! ```ignore
//! use pcx_algo::{models::ConverterStage, Optimizer, SearchConfig, SweepVariable};
//!
//! let outcome = Optimizer::new(SearchConfig::default())
//!     .with_sweep(SweepVariable::new("v_bus", vec![400.0, 600.0, 800.0]))
//!     .with_stage(pfc_stage)
//!     .with_stage(dcdc_stage)
//!     .run()?;
//! println!("{} designs on the frontier", outcome.frontier.len());
//! ```
//!
//! ## Features
//!
//! - `desktop` (default): parallel candidate evaluation and large cross-joins
//!   on the rayon pool

pub mod combine;
pub mod config;
pub mod enumerate;
pub mod evaluator;
pub mod grid;
pub mod models;
pub mod optimizer;
pub mod solver;

pub use combine::{combine_chain, combine_series, scale_modules};
pub use config::SearchConfig;
pub use enumerate::{ChoiceSpace, EnumerationStats, Enumerator};
pub use evaluator::{Evaluator, Infeasible, StaticProperties};
pub use grid::{LoadLevel, OperatingGrid, OperatingPoint, WeightNormalization};
pub use optimizer::{OptimizationOutcome, Optimizer, Stage, SweepPoint, SweepVariable};
pub use solver::{bisect_boundary, Bisection, RootFinder};
