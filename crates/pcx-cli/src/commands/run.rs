//! `pcx run`: optimize a study end to end.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pcx_core::Convention;
use pcx_io::{write_frontier_csv, write_frontier_json};
use tracing::{info, warn};

use crate::commands::util::print_points_table;
use pcx_cli::Study;

pub fn handle(
    study_path: &Path,
    out: &Path,
    archive: Option<&Path>,
    json: Option<&Path>,
    top: usize,
) -> Result<()> {
    let study = Study::load(study_path)?;
    let diagnostics = study.diagnose();
    for issue in &diagnostics.issues {
        warn!("{issue}");
    }
    if diagnostics.has_errors() {
        bail!(
            "study {} is invalid: {}",
            study_path.display(),
            diagnostics.summary()
        );
    }

    info!(
        stages = study.stages.len(),
        combinations = study.combination_count(),
        "optimizing {}",
        study_path.display()
    );
    let outcome = study
        .into_optimizer()
        .run()
        .context("running optimization")?;

    let rows = write_frontier_csv(&outcome.frontier, out)
        .with_context(|| format!("writing frontier to {}", out.display()))?;
    if let Some(path) = archive {
        write_frontier_csv(&outcome.archive, path)
            .with_context(|| format!("writing archive to {}", path.display()))?;
    }
    if let Some(path) = json {
        write_frontier_json(&outcome.frontier, path)
            .with_context(|| format!("writing JSON to {}", path.display()))?;
    }

    println!(
        "Evaluated {} sweep combinations ({} skipped) in {:.2?}",
        outcome.combinations, outcome.skipped, outcome.elapsed
    );
    println!(
        "Frontier: {} designs written to {} ({} archived)",
        rows,
        out.display(),
        outcome.archive.len()
    );
    if outcome.frontier.is_empty() {
        warn!("no feasible design in any sweep combination");
        return Ok(());
    }
    print_points_table(
        outcome.frontier.sorted_by_primary(),
        Convention::Efficiency,
        Some(top),
    )
}
