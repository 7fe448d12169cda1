//! `pcx frontier`: inspect and compose persisted frontiers.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pcx_algo::combine_series;
use pcx_cli::{ConventionArg, FrontierCommands};
use pcx_core::{Convention, FrontierMode, ParetoFrontier, PcxError};
use pcx_io::{
    detect_convention, frontier_to_json_value, load_frontier_csv, read_points_csv_lenient,
    write_frontier_csv,
};
use tracing::{info, warn};

use crate::commands::util::print_points_table;

pub fn handle(command: &FrontierCommands) -> Result<()> {
    match command {
        FrontierCommands::Show {
            file,
            convention,
            json,
            lenient,
        } => handle_show(file, *convention, *json, *lenient),
        FrontierCommands::Combine {
            upstream,
            downstream,
            out,
            convention,
        } => handle_combine(upstream, downstream, out, *convention),
        FrontierCommands::Merge {
            files,
            out,
            convention,
            archival,
        } => handle_merge(files, out, *convention, *archival),
    }
}

/// Explicit flag, then the first marker line, then efficiency. Every input
/// carrying a marker must agree with the result.
fn resolve_convention(paths: &[&Path], explicit: Option<ConventionArg>) -> Result<Convention> {
    let mut marked = Vec::with_capacity(paths.len());
    for &path in paths {
        let detected = detect_convention(path)
            .with_context(|| format!("reading header of {}", path.display()))?;
        if let Some(found) = detected {
            marked.push((path, found));
        }
    }

    let convention = explicit
        .map(Convention::from)
        .or_else(|| marked.first().map(|&(_, found)| found))
        .unwrap_or(Convention::Efficiency);
    for (path, found) in marked {
        if found != convention {
            return Err(PcxError::ConventionMismatch {
                expected: convention,
                found,
            })
            .with_context(|| format!("{} is a {found} frontier", path.display()));
        }
    }
    Ok(convention)
}

fn load(path: &Path, convention: Convention, mode: FrontierMode) -> Result<ParetoFrontier> {
    load_frontier_csv(path, convention, mode)
        .with_context(|| format!("loading frontier {}", path.display()))
}

fn handle_show(
    path: &Path,
    convention: Option<ConventionArg>,
    json: bool,
    lenient: bool,
) -> Result<()> {
    let convention = resolve_convention(&[path], convention)?;
    let frontier = if lenient {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let load = read_points_csv_lenient(file, convention);
        for issue in &load.diagnostics.issues {
            warn!("{issue}");
        }
        ParetoFrontier::from_points(convention, FrontierMode::Pruning, load.points)
    } else {
        load(path, convention, FrontierMode::Pruning)?
    };

    if json {
        let value = frontier_to_json_value(&frontier)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("{} ({} convention, {} designs)", path.display(), convention, frontier.len());
    print_points_table(frontier.sorted_by_primary(), convention, None)
}

fn handle_combine(
    upstream: &Path,
    downstream: &Path,
    out: &Path,
    convention: Option<ConventionArg>,
) -> Result<()> {
    let convention = resolve_convention(&[upstream, downstream], convention)?;
    let a = load(upstream, convention, FrontierMode::Pruning)?;
    let b = load(downstream, convention, FrontierMode::Pruning)?;
    let combined = combine_series(&a, &b).context("composing frontiers")?;
    let rows = write_frontier_csv(&combined, out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(upstream = a.len(), downstream = b.len(), combined = rows, "series composition");
    println!("Combined {} x {} designs into {} ({} kept)", a.len(), b.len(), out.display(), rows);
    Ok(())
}

fn handle_merge(
    files: &[PathBuf],
    out: &Path,
    convention: Option<ConventionArg>,
    archival: bool,
) -> Result<()> {
    if files.is_empty() {
        bail!("no input frontiers");
    }
    let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
    let convention = resolve_convention(&paths, convention)?;
    let mode = if archival {
        FrontierMode::Archival
    } else {
        FrontierMode::Pruning
    };

    let mut merged = ParetoFrontier::with_mode(convention, mode);
    let mut total = 0;
    for path in files {
        let frontier = load(path, convention, mode)?;
        total += frontier.len();
        merged
            .merge(frontier)
            .with_context(|| format!("merging {}", path.display()))?;
    }
    let rows = write_frontier_csv(&merged, out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "Merged {} files ({} designs) into {} ({} kept)",
        files.len(),
        total,
        out.display(),
        rows
    );
    Ok(())
}
