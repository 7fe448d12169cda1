//! # pcx-io: Persisted frontiers
//!
//! Frontiers are written as plain CSV so downstream tools (plotting,
//! spreadsheets) can read them without this crate:
//!
//! ```text
//! # pcx frontier convention=efficiency mode=pruning
//! # primary,volume,cost,tag...
//! 0.9731,1.42,212.5,v_bus=400,dcdc,modules=2,f=100kHz,sic650b,parallel=1,E65,awg14,turns=87,gap=14.700mm
//! ```
//!
//! Each record is `primary, volume, cost` followed by zero or more tag
//! fields. Numbers use the shortest representation that parses back to the
//! same `f64`, so a write/read cycle is exact.
//!
//! ## Loading
//!
//! - [`read_points_csv`] is strict: the first malformed row aborts the load
//!   with [`PcxError::Parse`](pcx_core::PcxError::Parse) naming the line,
//!   and nothing is returned.
//! - [`read_points_csv_lenient`] skips malformed rows whole, and efficiency
//!   rows above 1, reporting each one in
//!   [`Diagnostics`](pcx_core::Diagnostics).
//! - [`load_frontier_csv`] re-inserts every loaded point through the
//!   dominance rule, so a persisted pruning frontier round-trips to the same
//!   set.
//!
//! ## Export
//!
//! [`write_frontier_json`] writes a pretty-printed JSON document with the
//! convention, the mode and every point.

pub mod frontier_csv;
pub mod frontier_json;

pub use frontier_csv::{
    detect_convention, load_frontier_csv, read_points_csv, read_points_csv_lenient,
    write_frontier_csv, write_points_csv, LenientLoad,
};
pub use frontier_json::{frontier_to_json_value, write_frontier_json};
