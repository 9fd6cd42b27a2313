//! Multi-dataset p-value fusion.
//!
//! Combines one row of per-dataset p-values into a single combined p-value per gene. Four
//! interchangeable methods are supported: Fisher's and Stouffer's classical combinations, and
//! their covariance-corrected counterparts (Brown and Strube) for positively correlated
//! datasets. An optional directional penalty neutralizes datasets whose signed effect
//! contradicts a declared expected direction before fusion.

use crate::matrix::{DirectionMatrix, ScoreMatrix};
use anyhow::{Result, anyhow};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use std::str::FromStr;

pub mod combine;
pub mod empirical;

use combine::{fisher_combine, stouffer_combine};
use empirical::{BrownAdjustment, StrubeAdjustment};

/// P-value combination method for the combined ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMethod {
    /// Fisher's method: -2·Σ ln(p) against χ² with 2k degrees of freedom.
    Fisher,
    /// Stouffer's method: Σ z / √k against the standard normal.
    Stouffer,
    /// Fisher's statistic against an empirically rescaled χ² reference.
    Brown,
    /// Stouffer's sum with an empirically corrected variance.
    Strube,
}

impl FromStr for FusionMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fisher" => Ok(FusionMethod::Fisher),
            "stouffer" => Ok(FusionMethod::Stouffer),
            "brown" => Ok(FusionMethod::Brown),
            "strube" => Ok(FusionMethod::Strube),
            _ => Err(anyhow!("Unknown fusion method: {}", s)),
        }
    }
}

/// Anticipated direction of effect for one dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Up,
    Down,
}

impl Sign {
    fn as_f64(self) -> f64 {
        match self {
            Sign::Up => 1.0,
            Sign::Down => -1.0,
        }
    }
}

/// Direction-awareness inputs: per-gene signed effects plus the expected sign per dataset.
/// Columns with `None` expectation are unconstrained.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalInput<'a> {
    pub directions: &'a DirectionMatrix,
    pub expected: &'a [Option<Sign>],
}

/// Fuses every gene row of `scores` into one combined p-value, in gene order.
///
/// When `directional` is supplied, any dataset whose effect sign contradicts its expected
/// direction contributes p = 1 for that gene, so a conflicting signal can never boost the
/// combined score. With a single dataset every method reduces to the (penalized) input
/// p-values unchanged.
pub fn fuse_matrix(
    scores: &ScoreMatrix,
    method: FusionMethod,
    directional: Option<DirectionalInput<'_>>,
) -> Result<Vec<f64>> {
    let mut effective = scores.values().clone();
    if let Some(input) = directional {
        input.directions.validate_against(scores)?;
        if input.expected.len() != scores.n_datasets() {
            return Err(anyhow!(
                "Expected-direction vector has {} entries for {} datasets",
                input.expected.len(),
                scores.n_datasets()
            ));
        }
        apply_directional_penalty(&mut effective, input.directions, input.expected);
    }

    if scores.n_datasets() == 1 {
        return Ok(effective.column(0).to_vec());
    }

    let combined = match method {
        FusionMethod::Fisher => {
            row_map(&effective, |row| fisher_combine(row))
        }
        FusionMethod::Stouffer => {
            row_map(&effective, |row| stouffer_combine(row))
        }
        FusionMethod::Brown => {
            let adjustment = BrownAdjustment::estimate(&effective);
            row_map(&effective, move |row| adjustment.combine(row))
        }
        FusionMethod::Strube => {
            let adjustment = StrubeAdjustment::estimate(&effective);
            row_map(&effective, move |row| adjustment.combine(row))
        }
    };

    Ok(combined)
}

fn row_map<F>(matrix: &Array2<f64>, combine: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync + Send,
{
    matrix
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| combine(&row.to_vec()))
        .collect()
}

fn apply_directional_penalty(
    effective: &mut Array2<f64>,
    directions: &DirectionMatrix,
    expected: &[Option<Sign>],
) {
    for (col, constraint) in expected.iter().enumerate() {
        let Some(sign) = constraint else { continue };
        for row in 0..effective.nrows() {
            // A zero effect carries no direction and never contradicts the constraint.
            if directions.get(row, col) * sign.as_f64() < 0.0 {
                effective[(row, col)] = 1.0;
            }
        }
    }
}
