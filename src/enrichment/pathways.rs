//! Pathway (gene set) model and the statistical background.

use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};

/// A named, predefined set of genes sharing a functional annotation. Immutable once built;
/// duplicate member IDs are collapsed.
#[derive(Debug, Clone)]
pub struct Pathway {
    id: String,
    name: String,
    genes: HashSet<String>,
}

impl Pathway {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genes: impl IntoIterator<Item = String>,
    ) -> Self {
        Pathway {
            id: id.into(),
            name: name.into(),
            genes: genes.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genes(&self) -> &HashSet<String> {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Members that survive restriction to `background`.
    pub fn restricted_genes(&self, background: &HashSet<String>) -> HashSet<String> {
        self.genes.intersection(background).cloned().collect()
    }
}

/// An ordered collection of pathways keyed by unique identifier.
///
/// Filtering produces a new set and never mutates the source; iteration order is always the
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct PathwaySet {
    pathways: Vec<Pathway>,
    index: HashMap<String, usize>,
}

impl PathwaySet {
    pub fn new(pathways: Vec<Pathway>) -> Result<Self> {
        let mut index = HashMap::with_capacity(pathways.len());
        for (i, pathway) in pathways.iter().enumerate() {
            if index.insert(pathway.id.clone(), i).is_some() {
                return Err(anyhow!("Duplicate pathway ID: {}", pathway.id));
            }
        }
        Ok(PathwaySet { pathways, index })
    }

    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pathway> {
        self.index.get(id).map(|&i| &self.pathways[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pathway> {
        self.pathways.iter()
    }

    /// Retains pathways whose member count lies in `min..=max`, preserving order.
    pub fn filter_by_size(&self, min: usize, max: usize) -> PathwaySet {
        let filtered: Vec<Pathway> = self
            .pathways
            .iter()
            .filter(|p| p.len() >= min && p.len() <= max)
            .cloned()
            .collect();
        let index = filtered
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        PathwaySet {
            pathways: filtered,
            index,
        }
    }

    /// Union of all member genes, the default statistical background.
    pub fn background_union(&self) -> HashSet<String> {
        let mut background = HashSet::new();
        for pathway in &self.pathways {
            background.extend(pathway.genes.iter().cloned());
        }
        background
    }
}
