//! Correlation engine: unified taxon list, pairwise Pearson and
//! significance matrices, per-taxon relative-frequency maxima.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::analysis::matrix::SymmetricMatrix;
use crate::analysis::special::{pearson, pearson_p_value};
use crate::errors::{NetworkError, Result};
use crate::sample::Sample;
use crate::taxonomy::TaxonHierarchy;
use crate::types::{Rank, TaxonId};

/// Everything one analysis pass derives from the selected samples.
///
/// Matrix rows and columns, and the `max_relative_frequency` entries,
/// are aligned 1:1 with `taxa`.
#[derive(Debug)]
pub struct CorrelationResult {
    /// Aggregation rank the counts were rolled up to.
    pub rank: Rank,
    /// Number of samples that entered the analysis.
    pub sample_count: usize,
    /// Unified taxon list, ascending by taxon id.
    pub taxa: Vec<TaxonId>,
    /// Pairwise Pearson correlation. Diagonal fixed at 1, unused.
    pub correlation: SymmetricMatrix,
    /// Two-tailed significance of each correlation. Diagonal 0, unused.
    pub p_values: SymmetricMatrix,
    /// Per taxon: the maximum over samples of recursive count divided by
    /// the sample's total count.
    pub max_relative_frequency: Vec<f64>,
}

impl CorrelationResult {
    /// Coordinates of the strongest positive off-diagonal correlation.
    pub fn highest_positive(&self) -> Option<(usize, usize)> {
        self.extreme_coordinates(|best, candidate| candidate > best)
    }

    /// Coordinates of the strongest negative off-diagonal correlation.
    pub fn highest_negative(&self) -> Option<(usize, usize)> {
        self.extreme_coordinates(|best, candidate| candidate < best)
    }

    fn extreme_coordinates(&self, better: impl Fn(f64, f64) -> bool) -> Option<(usize, usize)> {
        let n = self.taxa.len();
        let mut best: Option<(usize, usize)> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let value = self.correlation.get(i, j);
                match best {
                    Some((bi, bj)) if !better(self.correlation.get(bi, bj), value) => {}
                    _ => best = Some((i, j)),
                }
            }
        }
        best
    }
}

/// Computes [`CorrelationResult`]s from a sample set and a rank.
#[derive(Debug)]
pub struct CorrelationEngine<'a> {
    hierarchy: &'a TaxonHierarchy,
}

impl<'a> CorrelationEngine<'a> {
    /// Create an engine over the given hierarchy.
    pub fn new(hierarchy: &'a TaxonHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Every taxon at `rank` with a nonzero recursive count in at least
    /// one sample, ascending by taxon id.
    ///
    /// Each counted entry is walked up to its ancestor at `rank`; a
    /// rank node's subtree sum is nonzero exactly when some counted
    /// descendant (or the node itself) exists, so this visits precisely
    /// the taxa the roll-up definition selects without scanning the
    /// whole taxonomy.
    pub fn unify_taxa(&self, samples: &[&Sample], rank: Rank) -> Vec<TaxonId> {
        let mut unified = BTreeSet::new();
        for sample in samples {
            for (&taxon, &count) in &sample.counts {
                if count == 0 {
                    continue;
                }
                if let Some(ancestor) = self.hierarchy.ancestor_at_rank(taxon, rank) {
                    unified.insert(ancestor);
                }
            }
        }
        unified.into_iter().collect()
    }

    /// One rolled-up count vector per sample; entry `i` is the recursive
    /// count of `taxa[i]` in that sample.
    pub fn count_vectors(&self, samples: &[&Sample], taxa: &[TaxonId]) -> Vec<Vec<u64>> {
        samples
            .iter()
            .map(|sample| {
                taxa.iter()
                    .map(|&t| self.hierarchy.recursive_count(sample, t))
                    .collect()
            })
            .collect()
    }

    /// Run the full analysis over the selected samples.
    ///
    /// Fails with [`NetworkError::InsufficientSamples`] below 3 samples;
    /// correlation and significance are unstable under that floor. This
    /// is the single authoritative precondition check.
    pub fn analyze(&self, samples: &[&Sample], rank: Rank) -> Result<CorrelationResult> {
        if samples.len() < 3 {
            return Err(NetworkError::InsufficientSamples {
                selected: samples.len(),
            });
        }

        let taxa = self.unify_taxa(samples, rank);
        let n = taxa.len();
        let sample_count = samples.len();
        let vectors = self.count_vectors(samples, &taxa);

        // Transpose into per-taxon observation vectors across samples.
        let observations: Vec<Vec<f64>> = (0..n)
            .map(|i| vectors.iter().map(|v| v[i] as f64).collect())
            .collect();

        // Read-only parallel phase over the unordered pairs, then a
        // sequential write-back, so cell order never depends on thread
        // scheduling.
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let cells: Vec<(usize, usize, f64, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let r = pearson(&observations[i], &observations[j]);
                let p = pearson_p_value(r, sample_count);
                (i, j, r, p)
            })
            .collect();

        let mut correlation = SymmetricMatrix::zeros(n);
        let mut p_values = SymmetricMatrix::zeros(n);
        for i in 0..n {
            correlation.set(i, i, 1.0);
        }
        for (i, j, r, p) in cells {
            correlation.set(i, j, r);
            p_values.set(i, j, p);
        }

        let totals: Vec<u64> = samples.iter().map(|s| s.total_count()).collect();
        let max_relative_frequency = (0..n)
            .map(|i| {
                vectors
                    .iter()
                    .zip(&totals)
                    .map(|(v, &total)| {
                        if total == 0 {
                            0.0
                        } else {
                            v[i] as f64 / total as f64
                        }
                    })
                    .fold(0.0, f64::max)
            })
            .collect();

        Ok(CorrelationResult {
            rank,
            sample_count,
            taxa,
            correlation,
            p_values,
            max_relative_frequency,
        })
    }
}
