//! Covariance-corrected combination references for correlated datasets.
//!
//! Brown's and Strube's methods keep the Fisher/Stouffer statistics but correct the reference
//! distribution using moments estimated empirically across all genes. Both converge to their
//! uncorrected counterparts when the dataset columns are independent.

use ndarray::Array2;

use super::combine::{
    P_CEIL, P_FLOOR, chi_squared_tail, fisher_statistic, normal_upper_tail, z_score_sum,
};
use statrs::distribution::{ContinuousCDF, Normal};

/// Rescaled χ² reference for Fisher's statistic (Brown's method).
///
/// With wᵢ = -2 ln(pᵢ), the statistic Σ wᵢ has expectation E = 2k and variance
/// Var = 4k + 2·Σᵢ<ⱼ cov(wᵢ, wⱼ); the covariances are estimated across genes. The statistic
/// divided by c = Var / 2E is referred to χ² with 2E²/Var degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct BrownAdjustment {
    scale: f64,
    df: f64,
}

impl BrownAdjustment {
    /// Estimates the adjustment from the (penalized) p-value matrix, genes × datasets.
    pub fn estimate(pvalues: &Array2<f64>) -> Self {
        let k = pvalues.ncols() as f64;
        let expected = 2.0 * k;

        let transformed = pvalues.mapv(|p| -2.0 * p.ln());
        let cov_sum = pairwise_covariance_sum(&transformed);
        let var = 4.0 * k + 2.0 * cov_sum;

        if var <= 0.0 {
            // Pathological negative covariance estimate; use the independent reference.
            return BrownAdjustment {
                scale: 1.0,
                df: expected,
            };
        }

        BrownAdjustment {
            scale: var / (2.0 * expected),
            df: 2.0 * expected * expected / var,
        }
    }

    pub fn combine(&self, pvalues: &[f64]) -> f64 {
        let stat = fisher_statistic(pvalues);
        chi_squared_tail(stat / self.scale, self.df)
    }
}

/// Variance-corrected Stouffer reference (Strube's method).
///
/// The z-score sum is divided by √(k + 2·Σᵢ<ⱼ rᵢⱼ) where rᵢⱼ is the empirical Pearson
/// correlation between the z-transformed dataset columns.
#[derive(Debug, Clone, Copy)]
pub struct StrubeAdjustment {
    denominator: f64,
}

impl StrubeAdjustment {
    pub fn estimate(pvalues: &Array2<f64>) -> Self {
        let k = pvalues.ncols() as f64;

        let normal = match Normal::new(0.0, 1.0) {
            Ok(dist) => dist,
            Err(_) => {
                return StrubeAdjustment {
                    denominator: k.sqrt(),
                };
            }
        };
        let z_matrix = pvalues.mapv(|p| -normal.inverse_cdf(p.clamp(P_FLOOR, P_CEIL)));

        let corr_sum = pairwise_correlation_sum(&z_matrix);
        let var = k + 2.0 * corr_sum;

        let denominator = if var > 0.0 { var.sqrt() } else { k.sqrt() };
        StrubeAdjustment { denominator }
    }

    pub fn combine(&self, pvalues: &[f64]) -> f64 {
        let z = z_score_sum(pvalues) / self.denominator;
        normal_upper_tail(z)
    }
}

/// Sum of sample covariances over all column pairs i < j.
fn pairwise_covariance_sum(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    if n < 2 {
        return 0.0;
    }

    let means: Vec<f64> = matrix
        .columns()
        .into_iter()
        .map(|col| col.sum() / n as f64)
        .collect();

    let mut total = 0.0;
    for i in 0..matrix.ncols() {
        for j in (i + 1)..matrix.ncols() {
            let mut cross = 0.0;
            for row in 0..n {
                cross += (matrix[(row, i)] - means[i]) * (matrix[(row, j)] - means[j]);
            }
            total += cross / (n - 1) as f64;
        }
    }
    total
}

/// Sum of Pearson correlations over all column pairs i < j. Constant columns contribute zero.
fn pairwise_correlation_sum(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    if n < 2 {
        return 0.0;
    }

    let ncols = matrix.ncols();
    let means: Vec<f64> = matrix
        .columns()
        .into_iter()
        .map(|col| col.sum() / n as f64)
        .collect();
    let stddevs: Vec<f64> = (0..ncols)
        .map(|c| {
            let ss: f64 = (0..n).map(|r| (matrix[(r, c)] - means[c]).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        })
        .collect();

    let mut total = 0.0;
    for i in 0..ncols {
        for j in (i + 1)..ncols {
            if stddevs[i] <= 0.0 || stddevs[j] <= 0.0 {
                continue;
            }
            let mut cross = 0.0;
            for row in 0..n {
                cross += (matrix[(row, i)] - means[i]) * (matrix[(row, j)] - means[j]);
            }
            let r = cross / ((n - 1) as f64 * stddevs[i] * stddevs[j]);
            total += r.clamp(-1.0, 1.0);
        }
    }
    total
}
