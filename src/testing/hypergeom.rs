//! Ranked hypergeometric over-representation test.
//!
//! For one pathway and one ranked gene list, finds the list prefix with the strongest
//! over-representation of pathway members and reports its one-sided hypergeometric tail
//! probability. Equivalent to running Fisher's exact test on the 2×2 membership × prefix
//! contingency at every prefix length and keeping the best.

use crate::testing::RankedTestOutcome;
use log::debug;
use statrs::distribution::{DiscreteCDF, Hypergeometric};
use std::collections::HashSet;

/// One-sided hypergeometric tail P(X ≥ k) for population `n`, successes `m`, draws `j`.
pub fn hypergeometric_tail(n: u64, m: u64, j: u64, k: u64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    match Hypergeometric::new(n, m, j) {
        // sf computes "more than k - 1", i.e. k or more.
        Ok(dist) => dist.sf(k - 1),
        Err(_) => 1.0, // Fallback for invalid parameters
    }
}

/// Scans every prefix of `ranked` and returns the minimal tail probability together with the
/// winning prefix and its pathway-member overlap.
///
/// The overlap count is maintained incrementally and the tail is only evaluated at steps
/// where the count increases: for a fixed overlap the tail probability is non-decreasing in
/// the prefix length, so no other step can improve the minimum.
///
/// Returns `None` for degenerate membership — no members in the background, or the whole
/// background — where the test carries no information.
pub fn ranked_hypergeometric_test(
    ranked: &[String],
    members: &HashSet<String>,
    background_size: usize,
) -> Option<RankedTestOutcome> {
    let population = background_size as u64;
    let successes = members.len() as u64;
    if successes == 0 || successes >= population {
        debug!(
            "Skipping degenerate pathway membership ({} of {})",
            successes, population
        );
        return None;
    }

    let mut overlap_positions: Vec<usize> = Vec::new();
    let mut best: Option<(f64, usize, usize)> = None; // (p, prefix_len, overlap_count)

    for (idx, gene) in ranked.iter().enumerate() {
        if !members.contains(gene) {
            continue;
        }
        overlap_positions.push(idx);
        let draws = (idx + 1) as u64;
        let observed = overlap_positions.len() as u64;
        let p = hypergeometric_tail(population, successes, draws, observed);
        if best.is_none_or(|(best_p, _, _)| p < best_p) {
            best = Some((p, idx + 1, overlap_positions.len()));
        }
    }

    let (p_value, prefix_len, overlap_count) = best?;
    let overlap = overlap_positions[..overlap_count]
        .iter()
        .map(|&i| ranked[i].clone())
        .collect();

    Some(RankedTestOutcome {
        p_value,
        prefix_len,
        overlap,
    })
}
