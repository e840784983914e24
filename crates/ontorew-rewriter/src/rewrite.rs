//! Rewriting driver.
//!
//! Orchestrates one rewriting pass for one query: find the maximal connected
//! clusters of atoms not matched by stored data, enumerate candidate tree
//! witnesses per cluster, collapse interchangeable ones, pick maximal
//! pairwise-compatible combinations, and inject each assembled formula into
//! the resulting union of conjunctive queries.
//!
//! The pass is synchronous and touches no state outside its own scope, so
//! independent queries may run through it concurrently against the same
//! resolver snapshot.

use crate::builder::TreeWitnessBuilder;
use crate::error::RewritingError;
use crate::formula::FormulaAssembler;
use crate::merge::MergeEngine;
use crate::resolver::GeneratorResolver;
use crate::witness::TreeWitness;
use ontorew_model::{Atom, ConjunctiveQuery, Term, UnionOfCQs, VariableGenerator};
use std::collections::BTreeSet;
use tracing::debug;

/// Knobs of the rewriting pass, passed explicitly by the caller.
#[derive(Debug, Clone)]
pub struct RewriterSettings {
    /// Upper bound on the size of candidate root sets enumerated per cluster;
    /// caps the subset enumeration on pathological queries.
    pub max_roots_per_cluster: usize,
}

impl Default for RewriterSettings {
    fn default() -> Self {
        RewriterSettings { max_roots_per_cluster: 4 }
    }
}

/// Rewrites `query` into a UCQ over extensional predicates.
///
/// `matched_terms` are the terms the mapping layer matches directly against
/// stored data; atoms mentioning only matched terms need no witness. The
/// original query is always the first disjunct (the pure data-matching
/// attempt); every maximal compatible witness combination contributes the
/// disjuncts of its distributed formula.
pub fn rewrite(
    query: &ConjunctiveQuery,
    matched_terms: &BTreeSet<Term>,
    resolver: &impl GeneratorResolver,
    settings: &RewriterSettings,
) -> Result<UnionOfCQs, RewritingError> {
    let unmatched: Vec<Atom> = query
        .atoms
        .iter()
        .filter(|a| !a.terms().is_subset(matched_terms))
        .cloned()
        .collect();
    if unmatched.is_empty() {
        return Ok(UnionOfCQs::new(vec![query.clone()]));
    }

    let clusters = connected_clusters(&unmatched);
    debug!(clusters = clusters.len(), "clustered unmatched query atoms");

    // Terms a witness may never swallow into its interior: they must stay
    // visible to the rest of the query.
    let mut protected: BTreeSet<Term> = matched_terms.clone();
    protected.extend(query.answer_vars.iter().cloned());

    let builder = TreeWitnessBuilder::new(resolver);
    let mut candidates: Vec<TreeWitness> = Vec::new();
    for cluster in &clusters {
        let cluster_terms: BTreeSet<Term> = cluster.iter().flat_map(|a| a.terms()).collect();
        // Pull in every query atom living on the cluster's terms: atoms fully
        // on the eventual roots become the witness's root atoms.
        let extended: Vec<Atom> = query
            .atoms
            .iter()
            .filter(|a| a.terms().is_subset(&cluster_terms))
            .cloned()
            .collect();
        for roots in root_subsets(&cluster_terms, settings.max_roots_per_cluster) {
            if let Some(tw) = builder.build(&extended, &roots)? {
                let swallowed = tw.cover().interior();
                if swallowed.iter().any(|t| protected.contains(t)) {
                    continue;
                }
                if !candidates.contains(&tw) {
                    candidates.push(tw);
                }
            }
        }
    }

    let candidates = MergeEngine::merge_candidates(candidates);
    debug!(candidates = candidates.len(), "tree-witness candidates after merge");

    let mut disjuncts = vec![query.clone()];
    for clique in maximal_compatible_sets(&candidates) {
        let mut selected: Vec<TreeWitness> =
            clique.iter().map(|&i| candidates[i].clone()).collect();
        let scope = query.terms();
        let mut vargen = VariableGenerator::new(&scope);
        let assembled = FormulaAssembler::assemble(&mut selected, query, &mut vargen);

        let kept: Vec<Atom> = query
            .atoms
            .iter()
            .filter(|a| !assembled.discharged_atoms.contains(a))
            .cloned()
            .collect();
        for conjunction in &assembled.formula.conjunctions {
            let mut atoms = kept.clone();
            atoms.extend(conjunction.iter().cloned());
            let cq = ConjunctiveQuery::new(query.answer_vars.clone(), atoms);
            if !disjuncts.contains(&cq) {
                disjuncts.push(cq);
            }
        }
    }

    Ok(UnionOfCQs::new(disjuncts))
}

/// Maximal connected components of `atoms` under term sharing.
fn connected_clusters(atoms: &[Atom]) -> Vec<Vec<Atom>> {
    let mut remaining: Vec<Atom> = atoms.to_vec();
    let mut clusters = Vec::new();
    while let Some(seed) = remaining.pop() {
        let mut cluster = vec![seed];
        let mut terms: BTreeSet<Term> = cluster[0].terms();
        loop {
            let (linked, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|a| !a.terms().is_disjoint(&terms));
            remaining = rest;
            if linked.is_empty() {
                break;
            }
            for a in linked {
                terms.extend(a.terms());
                cluster.push(a);
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Non-empty subsets of `terms` of size at most `max_size`, smallest first.
fn root_subsets(terms: &BTreeSet<Term>, max_size: usize) -> Vec<BTreeSet<Term>> {
    let items: Vec<&Term> = terms.iter().collect();
    let mut subsets = Vec::new();
    for size in 1..=max_size.min(items.len()) {
        let mut stack: Vec<(usize, Vec<usize>)> = vec![(0, Vec::new())];
        while let Some((start, chosen)) = stack.pop() {
            if chosen.len() == size {
                subsets.push(chosen.iter().map(|&i| items[i].clone()).collect());
                continue;
            }
            for i in start..items.len() {
                let mut next = chosen.clone();
                next.push(i);
                stack.push((i + 1, next));
            }
        }
    }
    subsets
}

/// Maximal sets of pairwise-compatible witnesses (maximal cliques of the
/// compatibility graph), as index sets into `candidates`.
///
/// Plain Bron–Kerbosch; the merge pass keeps candidate counts small enough
/// that pivoting is not worth its bookkeeping here.
fn maximal_compatible_sets(candidates: &[TreeWitness]) -> Vec<Vec<usize>> {
    fn adjacent(candidates: &[TreeWitness], a: usize, b: usize) -> bool {
        candidates[a].is_compatible_with(&candidates[b])
    }

    fn extend(
        candidates: &[TreeWitness],
        clique: &mut Vec<usize>,
        mut allowed: Vec<usize>,
        mut seen: Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if allowed.is_empty() && seen.is_empty() {
            if !clique.is_empty() {
                out.push(clique.clone());
            }
            return;
        }
        while let Some(v) = allowed.pop() {
            clique.push(v);
            let next_allowed =
                allowed.iter().copied().filter(|&u| adjacent(candidates, u, v)).collect();
            let next_seen =
                seen.iter().copied().filter(|&u| adjacent(candidates, u, v)).collect();
            extend(candidates, clique, next_allowed, next_seen, out);
            clique.pop();
            seen.push(v);
        }
    }

    let mut out = Vec::new();
    let mut clique = Vec::new();
    extend(candidates, &mut clique, (0..candidates.len()).collect(), Vec::new(), &mut out);
    out
}
