//! Incrementally maintained Pareto frontier.
//!
//! ## Dominance
//!
//! With loss, volume and cost all minimized, `a` dominates `b` iff
//!
//! ```text
//! a.loss ≤ b.loss  ∧  a.volume ≤ b.volume  ∧  a.cost ≤ b.cost
//! ```
//!
//! The rule is non-strict on all three objectives, so a point that ties an
//! existing point exactly is treated as dominated and is not inserted. For an
//! efficiency frontier the first comparison becomes `a.eff ≥ b.eff`.
//!
//! ## Storage
//!
//! Points live in a `Vec`; dominated points are dropped with `swap_remove`,
//! so iteration order is unspecified. Each insertion is a single O(n) pass.
//! The frontier size is bounded by the number of Pareto-optimal designs,
//! which stays small relative to the number of evaluated candidates.

use serde::Serialize;

use crate::{Convention, DesignPoint, Objective, PcxError, PcxResult};

/// Whether a frontier prunes dominated points or keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierMode {
    /// Only non-dominated points are retained
    #[default]
    Pruning,
    /// Every inserted point is retained (complete evaluated set for export)
    Archival,
}

/// Result of a single [`ParetoFrontier::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Added to a pruning frontier after removing `removed` dominated points
    Inserted { removed: usize },
    /// Dominated by (or tied with) an existing point; frontier unchanged
    Rejected,
    /// Appended to an archival frontier
    Archived,
}

impl InsertOutcome {
    pub fn was_added(self) -> bool {
        !matches!(self, InsertOutcome::Rejected)
    }
}

/// `true` if `a` dominates `b` under `convention` (non-strict on all objectives).
#[inline]
pub fn dominates(a: &DesignPoint, b: &DesignPoint, convention: Convention) -> bool {
    convention.better_or_equal(a.primary(), b.primary())
        && a.volume() <= b.volume()
        && a.cost() <= b.cost()
}

/// A collection of design points in which no point dominates another
/// (pruning mode), or the complete set of inserted points (archival mode).
///
/// Convention and mode are fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct ParetoFrontier {
    convention: Convention,
    mode: FrontierMode,
    points: Vec<DesignPoint>,
}

impl ParetoFrontier {
    /// Empty pruning frontier.
    pub fn new(convention: Convention) -> Self {
        Self::with_mode(convention, FrontierMode::Pruning)
    }

    /// Empty archival frontier.
    pub fn archival(convention: Convention) -> Self {
        Self::with_mode(convention, FrontierMode::Archival)
    }

    pub fn with_mode(convention: Convention, mode: FrontierMode) -> Self {
        Self {
            convention,
            mode,
            points: Vec::new(),
        }
    }

    /// Build a frontier by inserting every point in order.
    pub fn from_points<I>(convention: Convention, mode: FrontierMode, points: I) -> Self
    where
        I: IntoIterator<Item = DesignPoint>,
    {
        let mut frontier = Self::with_mode(convention, mode);
        for point in points {
            frontier.insert(point);
        }
        frontier
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn mode(&self) -> FrontierMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DesignPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[DesignPoint] {
        &self.points
    }

    /// Insert a point.
    ///
    /// In pruning mode every existing point is checked in both directions in
    /// one pass: if any existing point dominates `point` it is discarded,
    /// otherwise every point it dominates is removed before it is added.
    pub fn insert(&mut self, point: DesignPoint) -> InsertOutcome {
        if self.mode == FrontierMode::Archival {
            self.points.push(point);
            return InsertOutcome::Archived;
        }

        debug_assert!(
            self.convention == Convention::Loss || point.primary() <= 1.0,
            "efficiency above 1.0 reached the frontier: {point}"
        );

        let mut rejected = false;
        let mut dominated = Vec::new();
        for (idx, existing) in self.points.iter().enumerate() {
            if dominates(existing, &point, self.convention) {
                rejected = true;
            }
            if dominates(&point, existing, self.convention) {
                dominated.push(idx);
            }
        }

        if rejected {
            return InsertOutcome::Rejected;
        }

        // Descending order keeps the remaining indices valid under swap_remove.
        for &idx in dominated.iter().rev() {
            self.points.swap_remove(idx);
        }
        self.points.push(point);
        InsertOutcome::Inserted {
            removed: dominated.len(),
        }
    }

    /// Union with another frontier of the same convention.
    ///
    /// Pruning frontiers insert every point of `other`; archival frontiers
    /// concatenate.
    pub fn merge(&mut self, other: ParetoFrontier) -> PcxResult<()> {
        if other.convention != self.convention {
            return Err(PcxError::ConventionMismatch {
                expected: self.convention,
                found: other.convention,
            });
        }
        match self.mode {
            FrontierMode::Archival => self.points.extend(other.points),
            FrontierMode::Pruning => {
                for point in other.points {
                    self.insert(point);
                }
            }
        }
        Ok(())
    }

    /// `true` if any point has exactly these objective values.
    pub fn contains_objectives(&self, primary: f64, volume: f64, cost: f64) -> bool {
        self.points
            .iter()
            .any(|p| p.objectives() == (primary, volume, cost))
    }

    /// Best point for one objective: highest efficiency or lowest loss,
    /// volume or cost.
    pub fn best_by(&self, objective: Objective) -> Option<&DesignPoint> {
        let maximize = objective == Objective::Primary && self.convention == Convention::Efficiency;
        self.points.iter().min_by(|a, b| {
            let (x, y) = (a.objective(objective), b.objective(objective));
            if maximize {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        })
    }

    /// Points ordered best-first on the primary objective, ties broken by
    /// volume then cost.
    pub fn sorted_by_primary(&self) -> Vec<&DesignPoint> {
        let mut sorted: Vec<&DesignPoint> = self.points.iter().collect();
        sorted.sort_by(|a, b| {
            let primary = match self.convention {
                Convention::Loss => a.primary().total_cmp(&b.primary()),
                Convention::Efficiency => b.primary().total_cmp(&a.primary()),
            };
            primary
                .then(a.volume().total_cmp(&b.volume()))
                .then(a.cost().total_cmp(&b.cost()))
        });
        sorted
    }
}

impl<'a> IntoIterator for &'a ParetoFrontier {
    type Item = &'a DesignPoint;
    type IntoIter = std::slice::Iter<'a, DesignPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for ParetoFrontier {
    type Item = DesignPoint;
    type IntoIter = std::vec::IntoIter<DesignPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(loss: f64, volume: f64, cost: f64) -> DesignPoint {
        DesignPoint::new(loss, volume, cost, vec![format!("{loss}/{volume}/{cost}")]).unwrap()
    }

    #[test]
    fn test_dominance_is_non_strict() {
        let a = pt(1.0, 1.0, 1.0);
        let b = pt(1.0, 1.0, 1.0);
        assert!(dominates(&a, &b, Convention::Loss));
        assert!(dominates(&b, &a, Convention::Loss));
        assert!(!dominates(&pt(1.0, 2.0, 1.0), &pt(2.0, 1.0, 1.0), Convention::Loss));
    }

    #[test]
    fn test_efficiency_dominance_flips_primary() {
        let a = DesignPoint::efficiency(0.98, 1.0, 10.0, vec![]).unwrap();
        let b = DesignPoint::efficiency(0.97, 1.0, 10.0, vec![]).unwrap();
        assert!(dominates(&a, &b, Convention::Efficiency));
        assert!(!dominates(&b, &a, Convention::Efficiency));
        assert!(dominates(&b, &a, Convention::Loss));
    }

    #[test]
    fn test_insert_rejects_dominated() {
        let mut f = ParetoFrontier::new(Convention::Loss);
        assert_eq!(f.insert(pt(1.0, 1.0, 1.0)), InsertOutcome::Inserted { removed: 0 });
        assert_eq!(f.insert(pt(2.0, 1.0, 1.0)), InsertOutcome::Rejected);
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_insert_removes_exactly_dominated() {
        let mut f = ParetoFrontier::new(Convention::Loss);
        f.insert(pt(5.0, 5.0, 5.0));
        f.insert(pt(4.0, 4.0, 6.0));
        f.insert(pt(1.0, 9.0, 1.0));

        let outcome = f.insert(pt(3.0, 5.0, 5.0));
        assert_eq!(outcome, InsertOutcome::Inserted { removed: 1 });
        assert_eq!(f.len(), 3);
        assert!(!f.contains_objectives(5.0, 5.0, 5.0));
        assert!(f.contains_objectives(4.0, 4.0, 6.0));
        assert!(f.contains_objectives(1.0, 9.0, 1.0));
        assert!(f.contains_objectives(3.0, 5.0, 5.0));
    }

    #[test]
    fn test_exact_tie_keeps_existing_point() {
        let mut f = ParetoFrontier::new(Convention::Loss);
        f.insert(DesignPoint::new(2.0, 2.0, 2.0, vec!["first".into()]).unwrap());
        let outcome = f.insert(DesignPoint::new(2.0, 2.0, 2.0, vec!["second".into()]).unwrap());
        assert_eq!(outcome, InsertOutcome::Rejected);
        assert_eq!(f.len(), 1);
        assert_eq!(f.points()[0].tag(), ["first"]);
    }

    #[test]
    fn test_archival_keeps_everything() {
        let mut f = ParetoFrontier::archival(Convention::Loss);
        f.insert(pt(1.0, 1.0, 1.0));
        assert_eq!(f.insert(pt(2.0, 2.0, 2.0)), InsertOutcome::Archived);
        assert_eq!(f.insert(pt(1.0, 1.0, 1.0)), InsertOutcome::Archived);
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn test_merge_rejects_convention_mismatch() {
        let mut a = ParetoFrontier::new(Convention::Loss);
        let b = ParetoFrontier::new(Convention::Efficiency);
        assert!(matches!(
            a.merge(b),
            Err(PcxError::ConventionMismatch { .. })
        ));
    }

    #[test]
    fn test_merge_prunes() {
        let mut a = ParetoFrontier::new(Convention::Loss);
        a.insert(pt(2.0, 2.0, 2.0));
        let b = ParetoFrontier::from_points(
            Convention::Loss,
            FrontierMode::Pruning,
            [pt(1.0, 1.0, 1.0), pt(0.5, 3.0, 3.0)],
        );
        a.merge(b).unwrap();
        assert_eq!(a.len(), 2);
        assert!(!a.contains_objectives(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_best_by_respects_convention() {
        let f = ParetoFrontier::from_points(
            Convention::Efficiency,
            FrontierMode::Pruning,
            [
                DesignPoint::efficiency(0.97, 1.0, 5.0, vec![]).unwrap(),
                DesignPoint::efficiency(0.99, 3.0, 9.0, vec![]).unwrap(),
            ],
        );
        assert_eq!(f.best_by(Objective::Primary).unwrap().primary(), 0.99);
        assert_eq!(f.best_by(Objective::Volume).unwrap().volume(), 1.0);
        assert_eq!(f.sorted_by_primary()[0].primary(), 0.99);
    }
}
