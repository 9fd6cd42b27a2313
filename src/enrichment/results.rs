//! Result records produced by an analysis run.

use std::collections::HashSet;

/// Evidence label used when no individual dataset detects a pathway on its own.
pub const COMBINED_EVIDENCE: &str = "combined";

/// One significant pathway, with the statistics backing it.
#[derive(Debug, Clone)]
pub struct PathwayResult {
    pub id: String,
    pub name: String,
    /// Member count after background restriction.
    pub size: usize,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    /// Members of the winning ranked-list prefix, most significant first.
    pub overlap: Vec<String>,
    /// Names of the datasets that independently detect this pathway, or
    /// [`COMBINED_EVIDENCE`] alone when only the fused ranking finds it.
    pub evidence: Vec<String>,
}

impl PathwayResult {
    /// True when the pathway is only discoverable through fusion.
    pub fn is_combined_only(&self) -> bool {
        self.evidence.len() == 1 && self.evidence[0] == COMBINED_EVIDENCE
    }
}

/// Classification of one pathway between two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Significant in both runs.
    Shared,
    /// Significant in the baseline run only.
    Lost,
    /// Significant in the other run only.
    Gained,
}

#[derive(Debug, Clone)]
pub struct PathwayChange {
    pub id: String,
    pub kind: ChangeKind,
}

/// The complete outcome of one analysis run: significant pathways sorted by ascending raw
/// p-value, plus the diagnostics needed to audit degenerate-pathway skips.
#[derive(Debug, Clone)]
pub struct AnalysisResults {
    pub results: Vec<PathwayResult>,
    /// Dataset names, in score-matrix column order.
    pub datasets: Vec<String>,
    /// Pathways that passed size filtering and entered testing.
    pub pathways_tested: usize,
    /// Pathways skipped as degenerate after background restriction.
    pub pathways_skipped: usize,
}

impl AnalysisResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathwayResult> {
        self.results.iter()
    }

    pub fn get(&self, id: &str) -> Option<&PathwayResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn significant_ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.id.as_str()).collect()
    }

    /// 0/1 evidence membership per dataset column, for downstream exporters.
    pub fn evidence_indicator(&self, result: &PathwayResult) -> Vec<u8> {
        self.datasets
            .iter()
            .map(|d| u8::from(result.evidence.contains(d)))
            .collect()
    }

    /// Classifies pathway ids between this run (the baseline) and `other`: present in both
    /// is `Shared`, only here is `Lost`, only there is `Gained`. Order: baseline results
    /// first, then gains in the other run's order.
    pub fn compare(&self, other: &AnalysisResults) -> Vec<PathwayChange> {
        let own: HashSet<&str> = self.results.iter().map(|r| r.id.as_str()).collect();
        let theirs: HashSet<&str> = other.results.iter().map(|r| r.id.as_str()).collect();

        let mut changes: Vec<PathwayChange> = self
            .results
            .iter()
            .map(|r| PathwayChange {
                id: r.id.clone(),
                kind: if theirs.contains(r.id.as_str()) {
                    ChangeKind::Shared
                } else {
                    ChangeKind::Lost
                },
            })
            .collect();
        changes.extend(
            other
                .results
                .iter()
                .filter(|r| !own.contains(r.id.as_str()))
                .map(|r| PathwayChange {
                    id: r.id.clone(),
                    kind: ChangeKind::Gained,
                }),
        );
        changes
    }
}
