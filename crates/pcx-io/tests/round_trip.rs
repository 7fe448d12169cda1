//! Persisted frontier round trips through the filesystem

use std::fs;

use pcx_core::{Convention, DesignPoint, FrontierMode, ParetoFrontier, PcxError};
use pcx_io::{
    detect_convention, load_frontier_csv, read_points_csv_lenient, write_frontier_csv,
    write_frontier_json,
};
use tempfile::tempdir;

fn sample_frontier() -> ParetoFrontier {
    let mut frontier = ParetoFrontier::new(Convention::Efficiency);
    // Awkward decimals on purpose: the text form must parse back exactly
    for i in 0..40u32 {
        let x = f64::from(i);
        let efficiency = 0.9 + (x * 0.1).sin().abs() * 0.09;
        let volume = 0.1 + x / 7.0;
        let cost = 100.0 + (40.0 - x) * 3.3;
        frontier.insert(
            DesignPoint::efficiency(
                efficiency,
                volume,
                cost,
                vec![format!("design{i}"), "f=100kHz".into(), "with, comma".into()],
            )
            .unwrap(),
        );
    }
    frontier
}

fn sorted(frontier: &ParetoFrontier) -> Vec<DesignPoint> {
    let mut points = frontier.points().to_vec();
    points.sort_by(|a, b| a.objectives().partial_cmp(&b.objectives()).unwrap());
    points
}

#[test]
fn csv_round_trip_preserves_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frontier.csv");
    let frontier = sample_frontier();

    let written = write_frontier_csv(&frontier, &path).unwrap();
    assert_eq!(written, frontier.len());

    let loaded = load_frontier_csv(&path, Convention::Efficiency, FrontierMode::Pruning).unwrap();
    assert_eq!(sorted(&loaded), sorted(&frontier));
}

#[test]
fn marker_line_records_convention() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loss.csv");
    let frontier = ParetoFrontier::from_points(
        Convention::Loss,
        FrontierMode::Pruning,
        [DesignPoint::new(12.5, 0.3, 40.0, vec!["G3R40".into()]).unwrap()],
    );
    write_frontier_csv(&frontier, &path).unwrap();
    assert_eq!(detect_convention(&path).unwrap(), Some(Convention::Loss));

    let bare = dir.path().join("bare.csv");
    fs::write(&bare, "1,2,3\n").unwrap();
    assert_eq!(detect_convention(&bare).unwrap(), None);
}

#[test]
fn strict_load_names_file_and_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "0.9,1,2,a\n0.7,1,3,b\n0.8,1\n").unwrap();

    match load_frontier_csv(&path, Convention::Efficiency, FrontierMode::Pruning) {
        Err(PcxError::Parse(msg)) => {
            assert!(msg.contains("broken.csv"), "{msg}");
            assert!(msg.contains("line 3"), "{msg}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn efficiency_above_one_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("eff.csv");
    fs::write(&path, "1.2,1,1\n").unwrap();
    assert!(matches!(
        load_frontier_csv(&path, Convention::Efficiency, FrontierMode::Pruning),
        Err(PcxError::Validation(_))
    ));
    // The same row is a valid loss value
    assert!(load_frontier_csv(&path, Convention::Loss, FrontierMode::Pruning).is_ok());
}

#[test]
fn lenient_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    fs::write(&path, "0.9,1,2,a\nnot,a,row\n0.95,2,1,b\n").unwrap();
    let load = read_points_csv_lenient(fs::File::open(&path).unwrap(), Convention::Efficiency);
    assert_eq!(load.points.len(), 2);
    assert_eq!(load.diagnostics.error_count(), 1);
    assert_eq!(load.diagnostics.issues[0].line, Some(2));
}

#[test]
fn archival_frontier_keeps_dominated_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("archive.csv");
    fs::write(&path, "0.9,1,1\n0.8,2,2\n").unwrap();
    let archive = load_frontier_csv(&path, Convention::Efficiency, FrontierMode::Archival).unwrap();
    assert_eq!(archive.len(), 2);
    let pruned = load_frontier_csv(&path, Convention::Efficiency, FrontierMode::Pruning).unwrap();
    assert_eq!(pruned.len(), 1);
}

#[test]
fn json_export_is_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frontier.json");
    write_frontier_json(&sample_frontier(), &path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["convention"], "efficiency");
    assert!(value["points"].as_array().unwrap().len() > 1);
}
