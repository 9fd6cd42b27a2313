// End-to-end runs of the full analysis: fusion, ranked testing, correction, and
// evidence attribution through the public API.

use approx::assert_relative_eq;
use ndarray::array;
use std::collections::HashSet;

use multiomics_enrichment::config::AnalysisConfig;
use multiomics_enrichment::enrichment::{
    ChangeKind, EnrichmentAnalysis, Pathway, PathwaySet,
};
use multiomics_enrichment::fusion::{DirectionalInput, FusionMethod, Sign};
use multiomics_enrichment::matrix::{DirectionMatrix, ScoreMatrix};

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Three genes, two datasets, one pathway {A, B}: the minimal worked scenario.
fn three_gene_scores() -> ScoreMatrix {
    ScoreMatrix::new(
        strings(&["A", "B", "C"]),
        strings(&["d1", "d2"]),
        array![[0.01, 0.02], [0.5, 0.6], [0.9, 0.95]],
    )
    .unwrap()
}

fn three_gene_pathways() -> PathwaySet {
    PathwaySet::new(vec![Pathway::new("PW", "test pathway", strings(&["A", "B"]))]).unwrap()
}

fn three_gene_config() -> AnalysisConfig {
    AnalysisConfig::default()
        .with_fusion_method(FusionMethod::Fisher)
        .with_pathway_size_bounds(1, 100)
        .with_filter_cutoff(1.0)
        .with_significance_threshold(0.5)
        .with_background(strings(&["A", "B", "C"]).into_iter().collect())
}

#[test]
fn three_gene_end_to_end_scenario() {
    let scores = three_gene_scores();
    let pathways = three_gene_pathways();
    let results = EnrichmentAnalysis::new(&scores, &pathways, three_gene_config())
        .run()
        .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results.results[0];
    assert_eq!(result.id, "PW");
    assert_eq!(result.size, 2);
    // Fisher fusion ranks A first, B second, C last; the best prefix is the first two
    // entries, giving P(X >= 2 | N=3, K=2, n=2) = 1/3.
    assert_eq!(result.overlap, strings(&["A", "B"]));
    assert_relative_eq!(result.p_value, 1.0 / 3.0, epsilon = 1e-12);
    // A single test leaves Holm's adjustment at the raw value.
    assert_relative_eq!(result.adjusted_p_value, 1.0 / 3.0, epsilon = 1e-12);

    // At the lenient detection cutoff both datasets rank A and B on top themselves.
    assert_eq!(result.evidence, strings(&["d1", "d2"]));
    assert_eq!(results.evidence_indicator(result), vec![1, 1]);
}

#[test]
fn strict_detection_cutoff_yields_combined_evidence() {
    let scores = three_gene_scores();
    let pathways = three_gene_pathways();
    let config = three_gene_config().with_detection_cutoff(0.2);
    let results = EnrichmentAnalysis::new(&scores, &pathways, config)
        .run()
        .unwrap();

    // Each single dataset only reaches p = 1/3 > 0.2, so no individual dataset detects the
    // pathway and the finding is attributable to fusion alone.
    let result = &results.results[0];
    assert_eq!(result.evidence, strings(&["combined"]));
    assert!(result.is_combined_only());
    assert_eq!(results.evidence_indicator(result), vec![0, 0]);
}

#[test]
fn evidence_lists_exactly_the_detecting_datasets() {
    // d1 ranks the pathway genes on top; d2 ranks the outsider C first, so only d1
    // can detect the pathway on its own.
    let scores = ScoreMatrix::new(
        strings(&["A", "B", "C"]),
        strings(&["d1", "d2"]),
        array![[0.01, 0.9], [0.02, 0.95], [0.9, 0.5]],
    )
    .unwrap();
    let pathways = three_gene_pathways();
    let config = three_gene_config().with_detection_cutoff(0.4);
    let results = EnrichmentAnalysis::new(&scores, &pathways, config)
        .run()
        .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results.results[0];
    assert_eq!(result.evidence, strings(&["d1"]));
    assert_eq!(results.evidence_indicator(result), vec![1, 0]);
}

#[test]
fn background_restriction_reports_restricted_sizes() {
    let scores = three_gene_scores();
    let pathways = three_gene_pathways();

    // B removed from the background: the pathway shrinks to {A} within a universe of 2.
    let config = three_gene_config()
        .with_background(strings(&["A", "C"]).into_iter().collect());
    let results = EnrichmentAnalysis::new(&scores, &pathways, config)
        .run()
        .unwrap();
    let result = &results.results[0];
    assert_eq!(result.size, 1);
    assert_eq!(result.overlap, strings(&["A"]));
    // P(X >= 1 | N=2, K=1, n=1) = 1/2
    assert_relative_eq!(result.p_value, 0.5, epsilon = 1e-12);

    // With the background cut down to the pathway itself the test is degenerate and the
    // pathway is skipped, not errored.
    let config = three_gene_config()
        .with_background(strings(&["A", "B"]).into_iter().collect());
    let results = EnrichmentAnalysis::new(&scores, &pathways, config)
        .run()
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(results.pathways_tested, 1);
    assert_eq!(results.pathways_skipped, 1);
}

/// 20 genes, 2 datasets: one pathway strongly supported in both datasets, one noise
/// pathway. The noise pathway's members never enter the ranking.
fn two_pathway_inputs(up_p: f64) -> (ScoreMatrix, PathwaySet) {
    let gene_ids: Vec<String> = (0..20).map(|i| format!("g{}", i)).collect();
    let mut values = ndarray::Array2::from_elem((20, 2), 0.7);
    for row in 0..5 {
        values[(row, 0)] = up_p;
        values[(row, 1)] = up_p;
    }
    for row in 10..15 {
        values[(row, 0)] = 0.5;
        values[(row, 1)] = 0.6;
    }
    let scores = ScoreMatrix::new(
        gene_ids.clone(),
        strings(&["transcriptomics", "proteomics"]),
        values,
    )
    .unwrap();

    let pathways = PathwaySet::new(vec![
        Pathway::new("UP", "supported pathway", gene_ids[0..5].to_vec()),
        Pathway::new("NOISE", "background pathway", gene_ids[10..15].to_vec()),
    ])
    .unwrap();

    (scores, pathways)
}

#[test]
fn supported_pathway_found_with_default_thresholds() {
    let (scores, pathways) = two_pathway_inputs(0.001);
    let config = AnalysisConfig::default().with_fusion_method(FusionMethod::Fisher);
    let results = EnrichmentAnalysis::new(&scores, &pathways, config)
        .run()
        .unwrap();

    assert_eq!(results.pathways_tested, 2);
    // NOISE never enters the filtered ranking, so it produces no raw p-value.
    assert_eq!(results.pathways_skipped, 1);
    assert_eq!(results.len(), 1);

    let result = &results.results[0];
    assert_eq!(result.id, "UP");
    assert_eq!(result.size, 5);
    assert_eq!(result.overlap.len(), 5);
    // Perfect separation within a background of 10: 1/C(10,5)
    assert_relative_eq!(result.p_value, 1.0 / 252.0, epsilon = 1e-12);
    assert!(result.adjusted_p_value >= result.p_value);
    // Both datasets carry the signal on their own.
    assert_eq!(result.evidence, strings(&["transcriptomics", "proteomics"]));
}

#[test]
fn directional_penalty_can_lose_a_pathway() {
    // With p = 0.05 in both datasets the fused score clears the ranking cutoff, but once
    // the proteomics effects contradict the expected direction the penalized fusion
    // (0.05 combined with 1.0) no longer does.
    let (scores, pathways) = two_pathway_inputs(0.05);
    let config = AnalysisConfig::default().with_fusion_method(FusionMethod::Fisher);

    let baseline = EnrichmentAnalysis::new(&scores, &pathways, config.clone())
        .run()
        .unwrap();
    assert_eq!(baseline.significant_ids(), vec!["UP"]);

    let gene_ids: Vec<String> = (0..20).map(|i| format!("g{}", i)).collect();
    let mut effects = ndarray::Array2::from_elem((20, 2), 1.0);
    for row in 0..5 {
        effects[(row, 1)] = -1.0;
    }
    let directions = DirectionMatrix::new(gene_ids, effects).unwrap();
    let expected = [None, Some(Sign::Up)];

    let directional = EnrichmentAnalysis::new(&scores, &pathways, config)
        .with_directional(DirectionalInput {
            directions: &directions,
            expected: &expected,
        })
        .run()
        .unwrap();
    assert!(directional.is_empty());

    let changes = baseline.compare(&directional);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].id, "UP");
    assert_eq!(changes[0].kind, ChangeKind::Lost);

    let reverse = directional.compare(&baseline);
    assert_eq!(reverse[0].kind, ChangeKind::Gained);
}

#[test]
fn empty_pathway_set_after_filtering_is_fatal() {
    let scores = three_gene_scores();
    let pathways = three_gene_pathways();
    // Default bounds demand at least 5 members; the only pathway has 2.
    let config = AnalysisConfig::default()
        .with_background(strings(&["A", "B", "C"]).into_iter().collect::<HashSet<_>>());
    let err = EnrichmentAnalysis::new(&scores, &pathways, config).run();
    assert!(err.is_err());
}
