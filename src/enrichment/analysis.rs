//! Analysis orchestration: fusion, ranked testing, correction, and evidence attribution.

use anyhow::{Result, anyhow};
use log::debug;
use rayon::prelude::*;
use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::fusion::{DirectionalInput, fuse_matrix};
use crate::matrix::ScoreMatrix;
use crate::testing::RankedTestOutcome;
use crate::testing::hypergeom::ranked_hypergeometric_test;

use super::pathways::{Pathway, PathwaySet};
use super::ranking::build_ranked_list;
use super::results::{AnalysisResults, COMBINED_EVIDENCE, PathwayResult};

/// One pathway that survived the combined-ranking scan, before correction.
struct Candidate<'a> {
    pathway: &'a Pathway,
    restricted: HashSet<String>,
    outcome: RankedTestOutcome,
}

/// A full enrichment run over one score matrix and one pathway collection.
///
/// The run is a pure function of its inputs: fuse the per-dataset p-values into a combined
/// ranking, find each pathway's best-supported prefix, correct across pathways, and label
/// every significant pathway with the datasets whose own rankings also detect it.
pub struct EnrichmentAnalysis<'a> {
    scores: &'a ScoreMatrix,
    pathways: &'a PathwaySet,
    directional: Option<DirectionalInput<'a>>,
    config: AnalysisConfig,
}

impl<'a> EnrichmentAnalysis<'a> {
    pub fn new(
        scores: &'a ScoreMatrix,
        pathways: &'a PathwaySet,
        config: AnalysisConfig,
    ) -> Self {
        EnrichmentAnalysis {
            scores,
            pathways,
            directional: None,
            config,
        }
    }

    /// Enables the direction-aware penalty for this run.
    pub fn with_directional(mut self, input: DirectionalInput<'a>) -> Self {
        self.directional = Some(input);
        self
    }

    pub fn run(&self) -> Result<AnalysisResults> {
        self.config.validate()?;

        let filtered = self
            .pathways
            .filter_by_size(self.config.min_pathway_size, self.config.max_pathway_size);
        if filtered.is_empty() {
            return Err(anyhow!(
                "No pathways remain after size filtering ({}..={})",
                self.config.min_pathway_size,
                self.config.max_pathway_size
            ));
        }

        // The background is derived from the unfiltered collection so the statistical
        // universe does not depend on the size bounds.
        let background = match &self.config.background {
            Some(set) => set.clone(),
            None => self.pathways.background_union(),
        };
        if background.is_empty() {
            return Err(anyhow!("Empty background: no genes eligible for testing"));
        }

        let fused = fuse_matrix(self.scores, self.config.fusion_method, self.directional)?;
        let combined_ranking = build_ranked_list(
            self.scores.genes(),
            &fused,
            &background,
            self.config.filter_cutoff,
        );

        // Per-pathway scans share only read-only inputs; each worker owns its own slot.
        let pathway_refs: Vec<&Pathway> = filtered.iter().collect();
        let scanned: Vec<Option<Candidate<'_>>> = pathway_refs
            .par_iter()
            .map(|&pathway| {
                let restricted = pathway.restricted_genes(&background);
                ranked_hypergeometric_test(
                    combined_ranking.genes(),
                    &restricted,
                    background.len(),
                )
                .map(|outcome| Candidate {
                    pathway,
                    restricted,
                    outcome,
                })
            })
            .collect();

        let pathways_tested = scanned.len();
        let candidates: Vec<Candidate<'_>> = scanned.into_iter().flatten().collect();
        let pathways_skipped = pathways_tested - candidates.len();
        if pathways_skipped > 0 {
            debug!(
                "{} of {} pathways skipped as degenerate after background restriction",
                pathways_skipped, pathways_tested
            );
        }

        if candidates.is_empty() {
            return Ok(AnalysisResults {
                results: Vec::new(),
                datasets: self.scores.datasets().to_vec(),
                pathways_tested,
                pathways_skipped,
            });
        }

        let raw_p_values: Vec<f64> = candidates.iter().map(|c| c.outcome.p_value).collect();
        let adjusted = self.config.correction_method.adjust(&raw_p_values)?;

        let mut retained: Vec<(Candidate<'_>, f64)> = candidates
            .into_iter()
            .zip(adjusted)
            .filter(|(_, adj)| *adj <= self.config.significance_threshold)
            .collect();
        retained.sort_by(|a, b| {
            a.0.outcome
                .p_value
                .partial_cmp(&b.0.outcome.p_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let evidence = self.attribute_evidence(&retained, &background);

        let results = retained
            .into_iter()
            .zip(evidence)
            .map(|((candidate, adjusted_p), evidence)| PathwayResult {
                id: candidate.pathway.id().to_string(),
                name: candidate.pathway.name().to_string(),
                size: candidate.restricted.len(),
                p_value: candidate.outcome.p_value,
                adjusted_p_value: adjusted_p,
                overlap: candidate.outcome.overlap,
                evidence,
            })
            .collect();

        Ok(AnalysisResults {
            results,
            datasets: self.scores.datasets().to_vec(),
            pathways_tested,
            pathways_skipped,
        })
    }

    /// Re-runs the ranked test on each dataset's own raw ranking and collects, per retained
    /// pathway, the names of the datasets that detect it. Per-dataset runs are not corrected;
    /// detection is raw significance at the configured cutoff.
    fn attribute_evidence(
        &self,
        retained: &[(Candidate<'_>, f64)],
        background: &HashSet<String>,
    ) -> Vec<Vec<String>> {
        let detection_cutoff = self.config.resolved_detection_cutoff();
        let mut evidence: Vec<Vec<String>> = vec![Vec::new(); retained.len()];

        for (col, dataset) in self.scores.datasets().iter().enumerate() {
            let column = self.scores.column(col).to_vec();
            let ranking = build_ranked_list(
                self.scores.genes(),
                &column,
                background,
                self.config.filter_cutoff,
            );

            let detections: Vec<bool> = retained
                .par_iter()
                .map(|(candidate, _)| {
                    ranked_hypergeometric_test(
                        ranking.genes(),
                        &candidate.restricted,
                        background.len(),
                    )
                    .is_some_and(|outcome| outcome.p_value <= detection_cutoff)
                })
                .collect();

            for (labels, detected) in evidence.iter_mut().zip(detections) {
                if detected {
                    labels.push(dataset.clone());
                }
            }
        }

        for labels in &mut evidence {
            if labels.is_empty() {
                labels.push(COMBINED_EVIDENCE.to_string());
            }
        }
        evidence
    }
}
