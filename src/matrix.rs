//! Validated dense matrices of per-gene, per-dataset measurements.
//!
//! A [`ScoreMatrix`] holds one p-value per gene and dataset; a [`DirectionMatrix`] optionally
//! holds the matching signed effect magnitudes. Both are validated at construction — the
//! statistical routines downstream assume complete, in-range input and never repair it.

use anyhow::{Result, anyhow};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

/// Dense gene × dataset matrix of p-values.
///
/// Invariants, enforced at construction:
/// - at least one gene and one dataset
/// - gene IDs are unique
/// - every value is finite and in (0, 1]; `NaN` counts as a missing value and is rejected
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    genes: Vec<String>,
    datasets: Vec<String>,
    values: Array2<f64>,
    gene_index: HashMap<String, usize>,
}

impl ScoreMatrix {
    pub fn new(genes: Vec<String>, datasets: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if genes.is_empty() {
            return Err(anyhow!("Score matrix must contain at least one gene"));
        }
        if datasets.is_empty() {
            return Err(anyhow!("Score matrix must contain at least one dataset"));
        }
        if values.nrows() != genes.len() || values.ncols() != datasets.len() {
            return Err(anyhow!(
                "Score matrix shape ({}, {}) does not match {} genes x {} datasets",
                values.nrows(),
                values.ncols(),
                genes.len(),
                datasets.len()
            ));
        }

        let mut gene_index = HashMap::with_capacity(genes.len());
        for (i, gene) in genes.iter().enumerate() {
            if gene_index.insert(gene.clone(), i).is_some() {
                return Err(anyhow!("Duplicate gene ID in score matrix: {}", gene));
            }
        }

        for ((row, col), &p) in values.indexed_iter() {
            if p.is_nan() {
                return Err(anyhow!(
                    "Missing p-value for gene {} in dataset {}",
                    genes[row],
                    datasets[col]
                ));
            }
            if !p.is_finite() || p <= 0.0 || p > 1.0 {
                return Err(anyhow!(
                    "Invalid p-value {} for gene {} in dataset {}: must be in (0, 1]",
                    p,
                    genes[row],
                    datasets[col]
                ));
            }
        }

        Ok(ScoreMatrix {
            genes,
            datasets,
            values,
            gene_index,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_datasets(&self) -> usize {
        self.datasets.len()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Raw p-values of a single dataset column, in gene order.
    pub fn column(&self, dataset_idx: usize) -> ArrayView1<'_, f64> {
        self.values.column(dataset_idx)
    }

    pub fn gene_index(&self, gene: &str) -> Option<usize> {
        self.gene_index.get(gene).copied()
    }
}

/// Dense gene × dataset matrix of signed effect magnitudes, parallel to a [`ScoreMatrix`].
///
/// Values may be any finite real number; the sign carries the direction of effect. `NaN` is
/// rejected as missing data.
#[derive(Debug, Clone)]
pub struct DirectionMatrix {
    genes: Vec<String>,
    values: Array2<f64>,
}

impl DirectionMatrix {
    pub fn new(genes: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != genes.len() {
            return Err(anyhow!(
                "Direction matrix has {} rows for {} genes",
                values.nrows(),
                genes.len()
            ));
        }
        for ((row, col), &d) in values.indexed_iter() {
            if !d.is_finite() {
                return Err(anyhow!(
                    "Invalid effect value {} for gene {} in direction column {}",
                    d,
                    genes[row],
                    col
                ));
            }
        }
        Ok(DirectionMatrix { genes, values })
    }

    /// Checks that this matrix covers exactly the same genes, in the same order, and the same
    /// number of dataset columns as `scores`.
    pub fn validate_against(&self, scores: &ScoreMatrix) -> Result<()> {
        if self.values.ncols() != scores.n_datasets() {
            return Err(anyhow!(
                "Direction matrix has {} columns but score matrix has {} datasets",
                self.values.ncols(),
                scores.n_datasets()
            ));
        }
        if self.genes != scores.genes {
            return Err(anyhow!(
                "Direction matrix gene set does not match the score matrix"
            ));
        }
        Ok(())
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, gene_idx: usize, dataset_idx: usize) -> f64 {
        self.values[(gene_idx, dataset_idx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn genes(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_matrix() {
        let m = ScoreMatrix::new(
            genes(&["A", "B"]),
            genes(&["rna", "protein"]),
            array![[0.01, 0.02], [0.5, 1.0]],
        )
        .unwrap();
        assert_eq!(m.n_genes(), 2);
        assert_eq!(m.n_datasets(), 2);
        assert_eq!(m.gene_index("B"), Some(1));
        assert_eq!(m.column(1).to_vec(), vec![0.02, 1.0]);
    }

    #[test]
    fn test_rejects_zero_and_out_of_range() {
        let err = ScoreMatrix::new(genes(&["A"]), genes(&["d1"]), array![[0.0]]);
        assert!(err.is_err());
        let err = ScoreMatrix::new(genes(&["A"]), genes(&["d1"]), array![[1.5]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_missing_values() {
        let err = ScoreMatrix::new(genes(&["A"]), genes(&["d1"]), array![[f64::NAN]]);
        assert!(err.unwrap_err().to_string().contains("Missing p-value"));
    }

    #[test]
    fn test_rejects_duplicate_genes() {
        let err = ScoreMatrix::new(
            genes(&["A", "A"]),
            genes(&["d1"]),
            array![[0.1], [0.2]],
        );
        assert!(err.unwrap_err().to_string().contains("Duplicate gene ID"));
    }

    #[test]
    fn test_direction_matrix_dimension_mismatch() {
        let scores =
            ScoreMatrix::new(genes(&["A", "B"]), genes(&["d1"]), array![[0.1], [0.2]]).unwrap();
        let dirs = DirectionMatrix::new(genes(&["A", "B"]), array![[1.0, -1.0], [0.5, 2.0]])
            .unwrap();
        assert!(dirs.validate_against(&scores).is_err());
    }

    #[test]
    fn test_direction_matrix_gene_mismatch() {
        let scores =
            ScoreMatrix::new(genes(&["A", "B"]), genes(&["d1"]), array![[0.1], [0.2]]).unwrap();
        let dirs = DirectionMatrix::new(genes(&["A", "C"]), array![[1.0], [0.5]]).unwrap();
        assert!(dirs.validate_against(&scores).is_err());
    }
}
