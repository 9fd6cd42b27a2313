//! # multiomics-enrichment
//!
//! A Rust library for integrative pathway enrichment analysis across multi-omics datasets.
//!
//! This crate fuses per-gene significance scores from several parallel measurement datasets
//! (e.g. transcriptomics, proteomics, methylation assays) into one combined score per gene,
//! ranks genes by combined significance, and tests predefined pathways for over-representation
//! among the top-ranked genes. It is built for signals that are too weak to reach significance
//! in any single dataset alone and only become visible when the datasets are combined.
//!
//! ## Core Features
//!
//! - **P-value Fusion**: Fisher, Stouffer, Brown and Strube combination methods, with an
//!   optional direction-aware penalty for effects that contradict an expected sign
//! - **Ranked Enrichment Testing**: ordered hypergeometric test that optimizes the
//!   significance threshold over all prefixes of the ranked gene list
//! - **Multiple Testing Correction**: Holm, Bonferroni, FDR and related procedures
//! - **Evidence Attribution**: re-runs the enrichment test on each individual dataset's own
//!   ranking to label every finding with the datasets that support it
//!
//! ## Quick Start
//!
//! Build a [`matrix::ScoreMatrix`] and an [`enrichment::PathwaySet`], pick an
//! [`config::AnalysisConfig`], and run [`enrichment::EnrichmentAnalysis`]. The result is one
//! record per significant pathway carrying its raw and adjusted p-values, the supporting gene
//! overlap, and the set of datasets providing evidence for it.
//!
//! ## Module Organization
//!
//! - **[`matrix`]**: validated score and direction matrices
//! - **[`config`]**: run configuration with explicit defaults
//! - **[`fusion`]**: p-value combination methods
//! - **[`testing`]**: ranked hypergeometric test and multiple testing correction
//! - **[`enrichment`]**: pathway model, rankings, and the analysis orchestrator

pub mod config;
pub mod enrichment;
pub mod fusion;
pub mod matrix;
pub mod testing;
