//! Run configuration for an enrichment analysis.
//!
//! All defaults are enumerated here, once, and passed explicitly into the analysis entry
//! points — the statistical routines never read ambient state.

use crate::fusion::FusionMethod;
use crate::testing::CorrectionMethod;
use anyhow::{Result, anyhow};
use std::collections::HashSet;

/// Configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// P-value combination method used for the combined ranking.
    pub fusion_method: FusionMethod,
    /// Correction applied to the combined ranking's raw pathway p-values.
    pub correction_method: CorrectionMethod,
    /// Adjusted p-value cutoff for a pathway to appear in the results.
    pub significance_threshold: f64,
    /// Lenient cutoff truncating every ranked gene list before testing.
    pub filter_cutoff: f64,
    /// Raw p-value cutoff for a single dataset to count as detecting a pathway.
    /// Falls back to `filter_cutoff` when unset.
    pub detection_cutoff: Option<f64>,
    /// Minimum pathway size (member count) retained for testing.
    pub min_pathway_size: usize,
    /// Maximum pathway size retained for testing.
    pub max_pathway_size: usize,
    /// Statistical universe override. Defaults to the union of all pathway members.
    pub background: Option<HashSet<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            fusion_method: FusionMethod::Brown,
            correction_method: CorrectionMethod::Holm,
            significance_threshold: 0.1,
            filter_cutoff: 0.1,
            detection_cutoff: None,
            min_pathway_size: 5,
            max_pathway_size: 1000,
            background: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_fusion_method(mut self, method: FusionMethod) -> Self {
        self.fusion_method = method;
        self
    }

    pub fn with_correction_method(mut self, method: CorrectionMethod) -> Self {
        self.correction_method = method;
        self
    }

    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    pub fn with_filter_cutoff(mut self, cutoff: f64) -> Self {
        self.filter_cutoff = cutoff;
        self
    }

    pub fn with_detection_cutoff(mut self, cutoff: f64) -> Self {
        self.detection_cutoff = Some(cutoff);
        self
    }

    pub fn with_pathway_size_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_pathway_size = min;
        self.max_pathway_size = max;
        self
    }

    pub fn with_background(mut self, background: HashSet<String>) -> Self {
        self.background = Some(background);
        self
    }

    /// The cutoff used for per-dataset evidence detection.
    pub fn resolved_detection_cutoff(&self) -> f64 {
        self.detection_cutoff.unwrap_or(self.filter_cutoff)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("significance_threshold", self.significance_threshold),
            ("filter_cutoff", self.filter_cutoff),
            (
                "detection_cutoff",
                self.resolved_detection_cutoff(),
            ),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(anyhow!("{} must be in (0, 1], got {}", name, value));
            }
        }
        if self.min_pathway_size > self.max_pathway_size {
            return Err(anyhow!(
                "min_pathway_size {} exceeds max_pathway_size {}",
                self.min_pathway_size,
                self.max_pathway_size
            ));
        }
        Ok(())
    }
}
