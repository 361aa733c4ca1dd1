//! Hierarchy construction, lookup, and recursive count aggregation.

use std::collections::{HashMap, HashSet};

use crate::errors::{NetworkError, Result};
use crate::sample::Sample;
use crate::taxonomy::node::{TaxonNode, TaxonRecord};
use crate::types::{Rank, TaxonId};

/// Immutable-after-build tree of taxon nodes keyed by id.
#[derive(Debug)]
pub struct TaxonHierarchy {
    nodes: HashMap<TaxonId, TaxonNode>,
    root: TaxonId,
}

impl TaxonHierarchy {
    /// Construct and validate the hierarchy from raw records.
    ///
    /// Fails with [`NetworkError::MalformedHierarchy`] on duplicate ids,
    /// a parent id absent from the input set, zero or multiple roots, or
    /// any cycle / region unreachable from the root. No partial tree is
    /// ever returned.
    pub fn build(records: impl IntoIterator<Item = TaxonRecord>) -> Result<Self> {
        let mut nodes: HashMap<TaxonId, TaxonNode> = HashMap::new();
        let mut root = None;

        for rec in records {
            // A self-referential parent marks the root in NCBI dumps.
            let parent = rec.parent.filter(|&p| p != rec.id);
            if parent.is_none() {
                if let Some(existing) = root {
                    return Err(NetworkError::MalformedHierarchy(format!(
                        "multiple roots: {existing} and {}",
                        rec.id
                    )));
                }
                root = Some(rec.id);
            }
            let node = TaxonNode {
                id: rec.id,
                name: rec.name,
                rank: rec.rank,
                parent,
                children: Vec::new(),
            };
            if nodes.insert(rec.id, node).is_some() {
                return Err(NetworkError::MalformedHierarchy(format!(
                    "duplicate taxon id {}",
                    rec.id
                )));
            }
        }

        let root = root.ok_or_else(|| {
            NetworkError::MalformedHierarchy("no root node in input".into())
        })?;

        // Link children to parents; every declared parent must exist.
        let links: Vec<(TaxonId, TaxonId)> = nodes
            .values()
            .filter_map(|n| n.parent.map(|p| (p, n.id)))
            .collect();
        for (parent, child) in links {
            match nodes.get_mut(&parent) {
                Some(p) => p.children.push(child),
                None => {
                    return Err(NetworkError::MalformedHierarchy(format!(
                        "taxon {child} declares missing parent {parent}"
                    )))
                }
            }
        }

        let hierarchy = Self { nodes, root };
        hierarchy.check_reachability()?;
        Ok(hierarchy)
    }

    /// Every node must be reachable from the root; anything else means a
    /// cycle or a detached subtree.
    fn check_reachability(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().copied());
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(NetworkError::MalformedHierarchy(format!(
                "{} of {} nodes unreachable from root (cycle or orphan chain)",
                self.nodes.len() - seen.len(),
                self.nodes.len()
            )));
        }
        Ok(())
    }

    /// The root node.
    pub fn root(&self) -> &TaxonNode {
        &self.nodes[&self.root]
    }

    /// Point lookup; unknown ids are an error, never a default.
    pub fn lookup(&self, id: TaxonId) -> Result<&TaxonNode> {
        self.nodes.get(&id).ok_or(NetworkError::UnknownTaxon(id))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy is empty. Always false once built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &TaxonNode> {
        self.nodes.values()
    }

    /// The node's own raw count in `sample` plus the recursive counts of
    /// all its children.
    ///
    /// This is the aggregation primitive that rolls counts up to a
    /// coarser rank: the count of a genus is the sum over its whole
    /// subtree.
    pub fn recursive_count(&self, sample: &Sample, id: TaxonId) -> u64 {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            total += sample.count(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().copied());
            }
        }
        total
    }

    /// Nearest ancestor of `id` (including `id` itself) at `rank`.
    ///
    /// Returns `None` when the walk reaches the root without finding the
    /// rank, i.e. the taxon sits above the requested level.
    pub fn ancestor_at_rank(&self, id: TaxonId, rank: Rank) -> Option<TaxonId> {
        let mut current = self.nodes.get(&id)?;
        loop {
            if current.rank == rank {
                return Some(current.id);
            }
            current = self.nodes.get(&current.parent?)?;
        }
    }
}
