//! # pcx-core: Design points and Pareto frontiers
//!
//! Data model shared by the power converter design-space explorer.
//!
//! ## Design Philosophy
//!
//! A design is reduced to three competing objectives plus an opaque tag:
//!
//! - **Primary**: power loss in watts (minimized) or efficiency (maximized)
//! - **Volume**: liters-equivalent (minimized)
//! - **Cost**: currency units (minimized)
//!
//! The [`ParetoFrontier`] keeps only designs that no other design beats on all
//! three at once. Search engines insert candidates at high volume, so
//! insertion is a single linear pass over the (small) frontier.
//!
//! ## Quick Start
//!
//! ```rust
//! use pcx_core::*;
//!
//! let mut frontier = ParetoFrontier::new(Convention::Loss);
//!
//! frontier.insert(DesignPoint::new(12.0, 0.4, 80.0, vec!["G3R75".into()])?);
//! frontier.insert(DesignPoint::new(9.0, 0.6, 95.0, vec!["G3R40".into()])?);
//! // Worse on every objective than the first point: discarded
//! frontier.insert(DesignPoint::new(14.0, 0.5, 90.0, vec!["IPW60".into()])?);
//!
//! assert_eq!(frontier.len(), 2);
//! # Ok::<(), PcxError>(())
//! ```
//!
//! ## Modules
//!
//! - [`point`] - [`DesignPoint`], [`Convention`], [`Objective`]
//! - [`frontier`] - [`ParetoFrontier`] and the dominance rule
//! - [`diagnostics`] - Issue collection for lenient loading and validation
//! - [`error`] - [`PcxError`] / [`PcxResult`]

pub mod diagnostics;
pub mod error;
pub mod frontier;
pub mod point;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{PcxError, PcxResult};
pub use frontier::{dominates, FrontierMode, InsertOutcome, ParetoFrontier};
pub use point::{Convention, DesignPoint, Objective};
