//! Frontier composition.
//!
//! ## Series composition
//!
//! Two independently optimized stages connected in cascade. Every pair
//! `(a, b)` from the two frontiers becomes one composite candidate:
//!
//! ```text
//! efficiency:  η = η_a + η_b − 1        (fractional losses add)
//! loss:        P = P_a + P_b            (sub-assemblies of one component)
//! volume:      V = V_a + V_b
//! cost:        C = C_a + C_b
//! tag:         a.tag ++ b.tag
//! ```
//!
//! Composites are inserted into a new pruning frontier. The cross-join is
//! O(|A|·|B|), so both inputs must already be pruned; archival inputs are
//! refused.
//!
//! ## Module bundling
//!
//! A loss frontier for one module is lifted to a converter-level efficiency
//! frontier at a fixed module count `n` and total power `P`:
//!
//! ```text
//! η = 1 − P_loss·n / P,   V = V·n,   C = C·n
//! ```

use pcx_core::{Convention, DesignPoint, FrontierMode, ParetoFrontier, PcxError, PcxResult};
#[cfg(feature = "desktop")]
use rayon::prelude::*;

/// Cross-join sizes above this are split across the rayon pool.
#[cfg(feature = "desktop")]
const PARALLEL_PAIRS: usize = 1 << 14;

/// Series composition of two frontiers with the same convention.
///
/// Neither input is modified. Composite efficiencies at or below zero are
/// physically meaningless and are dropped.
pub fn combine_series(a: &ParetoFrontier, b: &ParetoFrontier) -> PcxResult<ParetoFrontier> {
    if a.convention() != b.convention() {
        return Err(PcxError::ConventionMismatch {
            expected: a.convention(),
            found: b.convention(),
        });
    }
    if a.mode() == FrontierMode::Archival || b.mode() == FrontierMode::Archival {
        return Err(PcxError::Unsupported(
            "series composition of archival frontiers".into(),
        ));
    }
    let convention = a.convention();

    #[cfg(feature = "desktop")]
    if a.len() * b.len() > PARALLEL_PAIRS {
        return a
            .points()
            .par_iter()
            .map(|pa| cross_row(pa, b, convention))
            .try_reduce(
                || ParetoFrontier::new(convention),
                |mut left, right| {
                    left.merge(right)?;
                    Ok(left)
                },
            );
    }

    let mut combined = ParetoFrontier::new(convention);
    for pa in a {
        combined.merge(cross_row(pa, b, convention)?)?;
    }
    Ok(combined)
}

/// All composites of one point of the upstream frontier.
fn cross_row(
    pa: &DesignPoint,
    b: &ParetoFrontier,
    convention: Convention,
) -> PcxResult<ParetoFrontier> {
    let mut row = ParetoFrontier::new(convention);
    for pb in b {
        let primary = match convention {
            Convention::Efficiency => pa.primary() + pb.primary() - 1.0,
            Convention::Loss => pa.primary() + pb.primary(),
        };
        if convention == Convention::Efficiency && primary <= 0.0 {
            continue;
        }
        let tag = pa.tag().iter().chain(pb.tag()).cloned().collect();
        row.insert(DesignPoint::new(
            primary,
            pa.volume() + pb.volume(),
            pa.cost() + pb.cost(),
            tag,
        )?);
    }
    Ok(row)
}

/// Series composition of a whole pipeline, folded in order.
///
/// Returns `None` for an empty pipeline.
pub fn combine_chain<I>(frontiers: I) -> PcxResult<Option<ParetoFrontier>>
where
    I: IntoIterator<Item = ParetoFrontier>,
{
    let mut iter = frontiers.into_iter();
    let Some(mut acc) = iter.next() else {
        return Ok(None);
    };
    for next in iter {
        acc = combine_series(&acc, &next)?;
    }
    Ok(Some(acc))
}

/// Lift a per-module loss frontier to a converter efficiency frontier.
///
/// Returns the number of points accepted into `dest`. Points whose scaled
/// loss reaches the total power are dropped, the same cut-off
/// [`combine_series`] applies to composites.
pub fn scale_modules(
    source: &ParetoFrontier,
    module_count: usize,
    total_power_w: f64,
    dest: &mut ParetoFrontier,
) -> PcxResult<usize> {
    if source.convention() != Convention::Loss {
        return Err(PcxError::ConventionMismatch {
            expected: Convention::Loss,
            found: source.convention(),
        });
    }
    if dest.convention() != Convention::Efficiency {
        return Err(PcxError::ConventionMismatch {
            expected: Convention::Efficiency,
            found: dest.convention(),
        });
    }
    if module_count == 0 {
        return Err(PcxError::Validation("module count must be at least 1".into()));
    }
    if !total_power_w.is_finite() || total_power_w <= 0.0 {
        return Err(PcxError::Validation(format!(
            "total power must be positive, got {total_power_w}"
        )));
    }

    let n = module_count as f64;
    let mut accepted = 0;
    for point in source {
        let efficiency = 1.0 - point.primary() * n / total_power_w;
        if efficiency <= 0.0 {
            continue;
        }
        let scaled = DesignPoint::efficiency(
            efficiency,
            point.volume() * n,
            point.cost() * n,
            point.tag().to_vec(),
        )?;
        if dest.insert(scaled).was_added() {
            accepted += 1;
        }
    }
    Ok(accepted)
}
