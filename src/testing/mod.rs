//! Hypothesis testing over ranked gene lists and multiple testing correction.

use anyhow::{Result, anyhow};
use std::str::FromStr;

pub mod correction;
pub mod hypergeom;

/// Multiple testing correction procedures for the combined ranking's pathway p-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMethod {
    /// Holm's step-down procedure (family-wise error rate). The default.
    Holm,
    Bonferroni,
    /// Benjamini-Hochberg false discovery rate.
    BenjaminiHochberg,
    /// Benjamini-Yekutieli FDR under arbitrary dependence.
    BenjaminiYekutieli,
    /// Hochberg's step-up procedure.
    Hochberg,
    /// No correction; raw p-values are passed through unchanged.
    None,
}

impl FromStr for CorrectionMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "holm" => Ok(CorrectionMethod::Holm),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "bh" | "fdr" | "benjamini-hochberg" => Ok(CorrectionMethod::BenjaminiHochberg),
            "by" | "benjamini-yekutieli" => Ok(CorrectionMethod::BenjaminiYekutieli),
            "hochberg" => Ok(CorrectionMethod::Hochberg),
            "none" => Ok(CorrectionMethod::None),
            _ => Err(anyhow!("Unknown correction method: {}", s)),
        }
    }
}

impl CorrectionMethod {
    /// Adjusts a vector of raw p-values, preserving input order.
    pub fn adjust(&self, p_values: &[f64]) -> Result<Vec<f64>> {
        match self {
            CorrectionMethod::Holm => correction::holm_correction(p_values),
            CorrectionMethod::Bonferroni => correction::bonferroni_correction(p_values),
            CorrectionMethod::BenjaminiHochberg => {
                correction::benjamini_hochberg_correction(p_values)
            }
            CorrectionMethod::BenjaminiYekutieli => {
                correction::benjamini_yekutieli_correction(p_values)
            }
            CorrectionMethod::Hochberg => correction::hochberg_correction(p_values),
            CorrectionMethod::None => Ok(p_values.to_vec()),
        }
    }
}

/// Outcome of the ranked hypergeometric scan for one pathway.
#[derive(Debug, Clone)]
pub struct RankedTestOutcome {
    /// Minimal one-sided hypergeometric tail probability over all ranked prefixes.
    pub p_value: f64,
    /// Length of the prefix achieving the minimum.
    pub prefix_len: usize,
    /// Pathway members inside the winning prefix, most significant first.
    pub overlap: Vec<String>,
}
