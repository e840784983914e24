//! Collapsing interchangeable tree witnesses.
//!
//! Two witnesses with the same term cover describe the same attachment point
//! and the same discharged atoms; if they also share a root concept, any one
//! of their generators realizes the anonymous element, so keeping them apart
//! only duplicates disjuncts in the final UCQ. The merge pass collapses each
//! such group into a single witness carrying the union of the generators. It
//! runs before compatibility-graph construction and strictly reduces the
//! candidate count without changing the rewriting's extension.

use crate::cover::TermCover;
use crate::witness::TreeWitness;
use std::collections::BTreeMap;
use tracing::debug;

pub struct MergeEngine;

impl MergeEngine {
    /// Merges two mergeable witnesses with identical covers. Calling this on
    /// witnesses with differing covers is a driver bug.
    pub fn merge_pair(a: TreeWitness, b: TreeWitness) -> TreeWitness {
        assert_eq!(a.cover(), b.cover(), "only witnesses with identical covers merge");
        let shared = a.root_concepts().intersect(b.root_concepts());
        assert!(!shared.is_empty(), "merged witnesses must share a root concept");
        let generators = a.generators().union(b.generators()).cloned().collect();
        TreeWitness::new(generators, a.cover().clone(), a.root_atoms().clone(), shared)
    }

    /// Greedily collapses mergeable witnesses within each cover-equivalence
    /// class. Non-mergeable witnesses pass through untouched.
    pub fn merge_candidates(candidates: Vec<TreeWitness>) -> Vec<TreeWitness> {
        let before = candidates.len();
        let mut by_cover: BTreeMap<TermCover, Vec<TreeWitness>> = BTreeMap::new();
        let mut passthrough = Vec::new();
        for tw in candidates {
            if tw.is_mergeable() {
                by_cover.entry(tw.cover().clone()).or_default().push(tw);
            } else {
                passthrough.push(tw);
            }
        }

        let mut merged = Vec::new();
        for (_, group) in by_cover {
            // Witnesses in a group merge as long as the running root-concept
            // intersection stays non-empty; a disagreeing witness starts a
            // new accumulator.
            let mut accumulators: Vec<TreeWitness> = Vec::new();
            'next: for tw in group {
                for acc in &mut accumulators {
                    if !acc.root_concepts().intersect(tw.root_concepts()).is_empty() {
                        *acc = MergeEngine::merge_pair(acc.clone(), tw);
                        continue 'next;
                    }
                }
                accumulators.push(tw);
            }
            merged.append(&mut accumulators);
        }

        merged.append(&mut passthrough);
        if merged.len() < before {
            debug!(before, after = merged.len(), "merged interchangeable tree witnesses");
        }
        merged
    }
}
