//! Analysis session: the explicit context object owning samples,
//! thresholds, and the derived network.

use std::sync::Arc;

use tracing::info;

use crate::analysis::{CorrelationEngine, CorrelationResult};
use crate::config::NetworkConfig;
use crate::errors::Result;
use crate::filter::FilterState;
use crate::graph::{NetworkBuilder, NetworkMetrics, TaxonNetwork, VisibilityFilter};
use crate::sample::SampleStore;
use crate::taxonomy::TaxonHierarchy;

/// Owns all mutable analysis state for one session.
///
/// Sample or rank changes invalidate the engine output and require
/// [`rebuild`](Self::rebuild); threshold changes only require
/// [`apply_filters`](Self::apply_filters). All mutation goes through
/// `&mut self`, so a rebuild or recompute always observes a stable
/// snapshot of samples and thresholds.
#[derive(Debug)]
pub struct AnalysisSession {
    hierarchy: Arc<TaxonHierarchy>,
    samples: SampleStore,
    filters: FilterState,
    config: NetworkConfig,
    result: Option<CorrelationResult>,
    network: Option<TaxonNetwork>,
    applied_revision: Option<u64>,
}

impl AnalysisSession {
    /// Create a session over a finished hierarchy with default policies.
    pub fn new(hierarchy: Arc<TaxonHierarchy>) -> Self {
        Self::with_config(hierarchy, NetworkConfig::default())
    }

    /// Create a session with explicit presentation policies.
    pub fn with_config(hierarchy: Arc<TaxonHierarchy>, config: NetworkConfig) -> Self {
        Self {
            hierarchy,
            samples: SampleStore::new(),
            filters: FilterState::default(),
            config,
            result: None,
            network: None,
            applied_revision: None,
        }
    }

    /// The shared taxonomy.
    pub fn hierarchy(&self) -> &TaxonHierarchy {
        &self.hierarchy
    }

    /// Loaded samples and their selection.
    pub fn samples(&self) -> &SampleStore {
        &self.samples
    }

    /// Mutable sample access. Additions, removals, and selection changes
    /// require a [`rebuild`](Self::rebuild) to take effect.
    pub fn samples_mut(&mut self) -> &mut SampleStore {
        &mut self.samples
    }

    /// Current thresholds.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Mutable threshold access. Follow mutations with
    /// [`apply_filters`](Self::apply_filters) (or a rebuild after a rank
    /// change).
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Presentation policies.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Output of the last successful analysis, if any.
    pub fn result(&self) -> Option<&CorrelationResult> {
        self.result.as_ref()
    }

    /// The current network, if one has been built.
    pub fn network(&self) -> Option<&TaxonNetwork> {
        self.network.as_ref()
    }

    /// Recompute engine output and rebuild the network from the selected
    /// samples at the current rank, then run the visibility recompute.
    ///
    /// On failure (notably `InsufficientSamples`) the previously built
    /// result and network are left untouched.
    pub fn rebuild(&mut self) -> Result<()> {
        let selected = self.samples.selected();
        let rank = self.filters.rank();

        let engine = CorrelationEngine::new(&self.hierarchy);
        let result = engine.analyze(&selected, rank)?;
        let mut network = NetworkBuilder::build(&result, &self.hierarchy)?;
        VisibilityFilter::apply(&mut network, &self.filters, &self.config);

        info!(
            taxa = result.taxa.len(),
            samples = result.sample_count,
            rank = %rank,
            "analysis rebuilt"
        );

        self.result = Some(result);
        self.network = Some(network);
        self.applied_revision = Some(self.filters.revision());
        Ok(())
    }

    /// Run the visibility recompute against the current thresholds.
    ///
    /// Returns true when a recompute ran; false when there is no network
    /// yet or the filter revision is already applied. Never fails: any
    /// threshold values, including inverted ranges, are valid inputs.
    pub fn apply_filters(&mut self) -> bool {
        let Some(network) = self.network.as_mut() else {
            return false;
        };
        if self.applied_revision == Some(self.filters.revision()) {
            return false;
        }
        VisibilityFilter::apply(network, &self.filters, &self.config);
        self.applied_revision = Some(self.filters.revision());
        true
    }

    /// Metrics for the current network, if one exists.
    pub fn metrics(&self) -> Option<NetworkMetrics> {
        self.network.as_ref().map(NetworkMetrics::compute)
    }
}
