//! Scalar root finding and boundary bisection.
//!
//! Continuous sub-parameters (air-gap length, junction temperature) are not
//! enumerated; they are found by local search inside an evaluator. The
//! [`RootFinder`] trait keeps that search injectable so any equation solver
//! satisfying the contract can replace [`Bisection`].

use crate::evaluator::Infeasible;

/// Black-box scalar equation solver: find `x` in `[lo, hi]` with `f(x) = 0`.
///
/// Failure to bracket or converge is reported as [`Infeasible`] for the
/// candidate being evaluated, never as a process-level error.
pub trait RootFinder: Send + Sync {
    fn solve(&self, f: &dyn Fn(f64) -> f64, lo: f64, hi: f64) -> Result<f64, Infeasible>;
}

/// Interval-halving root finder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Stop when the bracket is narrower than this
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 200,
        }
    }
}

impl RootFinder for Bisection {
    fn solve(&self, f: &dyn Fn(f64) -> f64, lo: f64, hi: f64) -> Result<f64, Infeasible> {
        if !(lo < hi) {
            return Err(Infeasible::new(format!("empty bracket [{lo}, {hi}]")));
        }
        let (mut lo, mut hi) = (lo, hi);
        let mut f_lo = f(lo);
        let f_hi = f(hi);
        if !f_lo.is_finite() || !f_hi.is_finite() {
            return Err(Infeasible::new("non-finite value at bracket end"));
        }
        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(Infeasible::new(format!("no sign change on [{lo}, {hi}]")));
        }

        for _ in 0..self.max_iterations {
            let mid = 0.5 * (lo + hi);
            let f_mid = f(mid);
            if !f_mid.is_finite() {
                return Err(Infeasible::new(format!("non-finite value at {mid}")));
            }
            if f_mid == 0.0 {
                return Ok(mid);
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
            if hi - lo < self.tolerance {
                return Ok(0.5 * (lo + hi));
            }
        }
        Err(Infeasible::new(format!(
            "bisection did not converge in {} iterations",
            self.max_iterations
        )))
    }
}

/// Largest `x` in `[lo, hi]` for which a monotone predicate still holds.
///
/// The predicate must be true below some boundary and false above it.
/// Returns `None` if it already fails at `lo` and `hi` if it holds
/// everywhere. The returned value always satisfies the predicate.
pub fn bisect_boundary<P>(
    lo: f64,
    hi: f64,
    tolerance: f64,
    max_iterations: usize,
    mut holds: P,
) -> Option<f64>
where
    P: FnMut(f64) -> bool,
{
    if !holds(lo) {
        return None;
    }
    if holds(hi) {
        return Some(hi);
    }
    let (mut lo, mut hi) = (lo, hi);
    for _ in 0..max_iterations {
        if hi - lo < tolerance {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if holds(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(lo)
}
