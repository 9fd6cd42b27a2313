//! Pathway enrichment over ranked gene lists.
//!
//! This module holds the pathway model, ranked-list construction, the analysis orchestrator,
//! and the result records it produces.
//!
//! ## Workflow
//!
//! 1. **Fusion**: every gene's per-dataset p-values are combined into one score
//! 2. **Ranking**: genes are ordered by combined significance within the background
//! 3. **Testing**: each pathway's best-supported ranking prefix is scored and corrected
//! 4. **Evidence**: each finding is labeled with the datasets that independently support it

mod analysis;
mod pathways;
mod ranking;
mod results;

pub use analysis::EnrichmentAnalysis;
pub use pathways::{Pathway, PathwaySet};
pub use ranking::{RankedGeneList, build_ranked_list};
pub use results::{
    AnalysisResults, COMBINED_EVIDENCE, ChangeKind, PathwayChange, PathwayResult,
};
