//! Classical p-value combination kernels.
//!
//! Pure per-row routines shared by the fusion methods: Fisher's log-sum statistic and
//! Stouffer's z-score sum, plus the distribution tail helpers they are referred to.

use num_traits::Float;
use single_utilities::traits::FloatOps;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Lower clamp keeping log/inverse-normal transforms finite.
pub(crate) const P_FLOOR: f64 = 1e-300;
/// Upper clamp: one ulp short of 1.0 so the one-sided z-score stays finite.
pub(crate) const P_CEIL: f64 = 1.0 - 1e-16;

/// Fisher's combined statistic, -2·Σ ln(pᵢ).
pub(crate) fn fisher_statistic<T>(pvalues: &[T]) -> f64
where
    T: FloatOps,
{
    let log_sum = pvalues
        .iter()
        .map(|&p| Float::ln(p).to_f64().unwrap_or(0.0))
        .sum::<f64>();
    -2.0 * log_sum
}

/// Sum of one-sided z-scores, Σ Φ⁻¹(1 - pᵢ).
pub(crate) fn z_score_sum<T>(pvalues: &[T]) -> f64
where
    T: FloatOps,
{
    let normal = match Normal::new(0.0, 1.0) {
        Ok(dist) => dist,
        Err(_) => return 0.0,
    };
    pvalues
        .iter()
        .map(|&p| {
            let p = p.to_f64().unwrap_or(1.0).clamp(P_FLOOR, P_CEIL);
            // Φ⁻¹(1 - p) = -Φ⁻¹(p); the latter keeps precision for small p.
            -normal.inverse_cdf(p)
        })
        .sum()
}

/// Fisher's method: the combined statistic follows χ² with 2k degrees of freedom under
/// independence.
pub fn fisher_combine<T>(pvalues: &[T]) -> T
where
    T: FloatOps,
{
    if pvalues.is_empty() {
        return T::one();
    }
    let stat = fisher_statistic(pvalues);
    let df = 2.0 * pvalues.len() as f64;
    T::from(chi_squared_tail(stat, df)).unwrap()
}

/// Stouffer's method: the z-score sum divided by √k follows the standard normal under
/// independence.
pub fn stouffer_combine<T>(pvalues: &[T]) -> T
where
    T: FloatOps,
{
    if pvalues.is_empty() {
        return T::one();
    }
    let z = z_score_sum(pvalues) / (pvalues.len() as f64).sqrt();
    T::from(normal_upper_tail(z)).unwrap()
}

/// Upper tail of χ²(df) at `stat`, clamped into (0, 1].
pub(crate) fn chi_squared_tail(stat: f64, df: f64) -> f64 {
    match ChiSquared::new(df) {
        Ok(dist) => clamp_pvalue(dist.sf(stat)),
        Err(_) => 1.0, // Fallback for invalid parameters
    }
}

/// Upper tail of the standard normal at `z`, clamped into (0, 1].
pub(crate) fn normal_upper_tail(z: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => clamp_pvalue(dist.sf(z)),
        Err(_) => 1.0,
    }
}

pub(crate) fn clamp_pvalue(p: f64) -> f64 {
    if p.is_nan() {
        return 1.0;
    }
    p.clamp(P_FLOOR, 1.0)
}
