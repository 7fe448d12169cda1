//! `pcx validate`: check a study file without running it.

use std::path::Path;

use anyhow::{bail, Result};
use pcx_cli::Study;

pub fn handle(study_path: &Path) -> Result<()> {
    let study = Study::load(study_path)?;
    let diagnostics = study.diagnose();
    if diagnostics.has_issues() {
        print!("{diagnostics}");
    }
    if diagnostics.has_errors() {
        bail!("study {} is invalid", study_path.display());
    }

    let stages: Vec<&str> = study.stages.iter().map(|s| s.name.as_str()).collect();
    println!(
        "Study OK: {} stage(s) [{}], {} sweep variable(s), {} combination(s)",
        stages.len(),
        stages.join(" -> "),
        study.sweeps.len(),
        study.combination_count()
    );
    Ok(())
}
