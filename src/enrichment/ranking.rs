//! Ranked gene list construction.

use std::collections::HashSet;

/// Genes ordered by ascending p-value, restricted to the background and truncated at the
/// lenient filter cutoff. Built once per ranking run and consumed read-only by the tester.
#[derive(Debug, Clone)]
pub struct RankedGeneList {
    genes: Vec<String>,
    p_values: Vec<f64>,
}

impl RankedGeneList {
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Builds a ranking from one p-value per gene (fused scores, or a single dataset's raw
/// column for evidence attribution).
///
/// Genes outside `background` or above `cutoff` are dropped. The sort is stable, so tied
/// p-values keep their original row order.
pub fn build_ranked_list(
    gene_ids: &[String],
    p_values: &[f64],
    background: &HashSet<String>,
    cutoff: f64,
) -> RankedGeneList {
    let mut entries: Vec<(usize, f64)> = gene_ids
        .iter()
        .zip(p_values.iter())
        .enumerate()
        .filter(|&(_, (gene, &p))| background.contains(gene.as_str()) && p <= cutoff)
        .map(|(idx, (_, &p))| (idx, p))
        .collect();

    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let genes = entries
        .iter()
        .map(|&(idx, _)| gene_ids[idx].clone())
        .collect();
    let p_values = entries.iter().map(|&(_, p)| p).collect();
    RankedGeneList { genes, p_values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(genes: &[&str]) -> Vec<String> {
        genes.iter().map(|s| s.to_string()).collect()
    }

    fn background(genes: &[&str]) -> HashSet<String> {
        genes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_ascending() {
        let list = build_ranked_list(
            &ids(&["a", "b", "c"]),
            &[0.5, 0.01, 0.3],
            &background(&["a", "b", "c"]),
            1.0,
        );
        assert_eq!(list.genes(), ids(&["b", "c", "a"]).as_slice());
        assert_eq!(list.p_values(), &[0.01, 0.3, 0.5]);
    }

    #[test]
    fn test_background_restriction() {
        let list = build_ranked_list(
            &ids(&["a", "b", "c"]),
            &[0.01, 0.02, 0.03],
            &background(&["a", "c"]),
            1.0,
        );
        assert_eq!(list.genes(), ids(&["a", "c"]).as_slice());
    }

    #[test]
    fn test_cutoff_truncation() {
        let list = build_ranked_list(
            &ids(&["a", "b", "c"]),
            &[0.05, 0.5, 0.1],
            &background(&["a", "b", "c"]),
            0.1,
        );
        assert_eq!(list.genes(), ids(&["a", "c"]).as_slice());
    }

    #[test]
    fn test_stable_tie_break() {
        let list = build_ranked_list(
            &ids(&["z", "a", "m"]),
            &[0.5, 0.5, 0.5],
            &background(&["z", "a", "m"]),
            1.0,
        );
        // Ties keep input row order, not alphabetical order.
        assert_eq!(list.genes(), ids(&["z", "a", "m"]).as_slice());
    }
}
