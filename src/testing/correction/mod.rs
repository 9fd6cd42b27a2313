use anyhow::{Result, anyhow};
use std::cmp::Ordering;

/// Multiple testing correction procedures applied to the pathway-level p-values
/// of one ranking run.

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}

fn sorted_by_value(p_values: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> =
        p_values.iter().enumerate().map(|(i, &p)| (i, p)).collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    indexed
}

/// Apply Bonferroni correction to p-values
///
/// Multiplies each p-value by the number of tests, capping at 1.0.
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();
    let adjusted = p_values.iter().map(|&p| (p * n as f64).min(1.0)).collect();
    Ok(adjusted)
}

/// Apply Holm's step-down method for controlling family-wise error rate
///
/// Processes p-values from smallest to largest, multiplying the i-th smallest by (n - i)
/// and enforcing monotonicity with a running maximum. Uniformly more powerful than the
/// plain Bonferroni correction.
pub fn holm_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let indexed = sorted_by_value(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut running_max = 0.0_f64;

    for (rank, &(orig_idx, p_val)) in indexed.iter().enumerate() {
        let adjustment = (p_val * (n - rank) as f64).min(1.0);
        running_max = running_max.max(adjustment);
        adjusted_p_values[orig_idx] = running_max;
    }

    Ok(adjusted_p_values)
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// Processes p-values from largest to smallest, scaling each by n / rank and enforcing
/// monotonicity with a running minimum.
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let indexed = sorted_by_value(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min = 1.0_f64;

    for i in (0..n).rev() {
        let (orig_idx, p_val) = indexed[i];
        let rank = i + 1;
        let adjustment = (p_val * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Apply Benjamini-Yekutieli (BY) procedure for controlling false discovery rate under dependence
///
/// A more conservative variant of BH that is valid under arbitrary dependence structures;
/// the BH adjustment is additionally scaled by the harmonic number c(n).
pub fn benjamini_yekutieli_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let c_n: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();

    let indexed = sorted_by_value(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min = 1.0_f64;

    for i in (0..n).rev() {
        let (orig_idx, p_val) = indexed[i];
        let rank = i + 1;
        let adjustment = (p_val * c_n * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Apply Hochberg's step-up method for controlling family-wise error rate
///
/// Processes p-values from largest to smallest; more powerful than Holm's procedure when
/// the tests are independent.
pub fn hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let mut indexed = sorted_by_value(p_values);
    indexed.reverse();

    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min = 1.0_f64;

    for (i, &(orig_idx, p_val)) in indexed.iter().enumerate() {
        let adjustment = (p_val * n as f64 / (n - i) as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}
