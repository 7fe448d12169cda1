//! Property tests for ParetoFrontier insertion and merge semantics.

use pcx_core::{dominates, Convention, DesignPoint, FrontierMode, ParetoFrontier};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Integer-valued objectives so that partial and exact ties actually occur.
fn random_points(rng: &mut StdRng, n: usize) -> Vec<DesignPoint> {
    (0..n)
        .map(|i| {
            DesignPoint::new(
                rng.gen_range(0..20) as f64,
                rng.gen_range(0..20) as f64,
                rng.gen_range(0..20) as f64,
                vec![format!("cand{i}")],
            )
            .unwrap()
        })
        .collect()
}

fn objective_set(frontier: &ParetoFrontier) -> Vec<(u64, u64, u64)> {
    let mut set: Vec<_> = frontier
        .iter()
        .map(|p| (p.primary().to_bits(), p.volume().to_bits(), p.cost().to_bits()))
        .collect();
    set.sort_unstable();
    set
}

fn build(points: &[DesignPoint]) -> ParetoFrontier {
    ParetoFrontier::from_points(Convention::Loss, FrontierMode::Pruning, points.iter().cloned())
}

#[test]
fn test_no_point_dominates_another() {
    let mut rng = StdRng::seed_from_u64(7);
    let frontier = build(&random_points(&mut rng, 400));

    let points = frontier.points();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i != j {
                assert!(
                    !dominates(a, b, Convention::Loss),
                    "{a} dominates {b} inside the frontier"
                );
            }
        }
    }
}

#[test]
fn test_insertion_order_does_not_change_result() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut points = random_points(&mut rng, 300);
    let reference = objective_set(&build(&points));

    for _ in 0..10 {
        points.shuffle(&mut rng);
        assert_eq!(objective_set(&build(&points)), reference);
    }
}

#[test]
fn test_reinserting_members_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut frontier = build(&random_points(&mut rng, 200));
    let before = objective_set(&frontier);

    for point in frontier.points().to_vec() {
        assert!(!frontier.insert(point).was_added());
    }
    assert_eq!(objective_set(&frontier), before);
}

#[test]
fn test_dominated_insert_leaves_frontier_unchanged() {
    let mut frontier = build(&[
        DesignPoint::new(1.0, 5.0, 5.0, vec![]).unwrap(),
        DesignPoint::new(5.0, 1.0, 5.0, vec![]).unwrap(),
    ]);
    let before = objective_set(&frontier);
    frontier.insert(DesignPoint::new(2.0, 6.0, 5.0, vec![]).unwrap());
    assert_eq!(objective_set(&frontier), before);
}

#[test]
fn test_tied_candidate_is_not_duplicated() {
    let mut frontier = build(&[DesignPoint::new(3.0, 3.0, 3.0, vec!["kept".into()]).unwrap()]);
    frontier.insert(DesignPoint::new(3.0, 3.0, 3.0, vec!["tie".into()]).unwrap());

    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier.points()[0].tag(), ["kept"]);
}

#[test]
fn test_merge_is_associative() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = build(&random_points(&mut rng, 120));
    let y = build(&random_points(&mut rng, 120));
    let z = build(&random_points(&mut rng, 120));

    let mut left = x.clone();
    left.merge(y.clone()).unwrap();
    left.merge(z.clone()).unwrap();

    let mut yz = y;
    yz.merge(z).unwrap();
    let mut right = x;
    right.merge(yz).unwrap();

    assert_eq!(objective_set(&left), objective_set(&right));
}

#[test]
fn test_archival_merge_concatenates() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut archive = ParetoFrontier::archival(Convention::Loss);
    let batch = ParetoFrontier::from_points(
        Convention::Loss,
        FrontierMode::Archival,
        random_points(&mut rng, 50),
    );
    archive.merge(batch.clone()).unwrap();
    archive.merge(batch).unwrap();
    assert_eq!(archive.len(), 100);
}
