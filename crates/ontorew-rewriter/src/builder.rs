//! Candidate tree-witness construction.
//!
//! Given a maximal connected cluster of query atoms none of whose terms are
//! matched by stored data, and a candidate set of attachment (root) terms, the
//! builder decides whether a single anonymous canonical-model element can
//! discharge the non-root part of the cluster, and if so which `∃R.B`
//! generators realize it.

use crate::cover::{RootConceptSet, TermCover};
use crate::error::InconsistentOntology;
use crate::resolver::GeneratorResolver;
use crate::witness::TreeWitness;
use ontorew_model::{Atom, Concept, ExistentialGenerator, Term};
use std::collections::BTreeSet;
use tracing::trace;

pub struct TreeWitnessBuilder<'a, R: GeneratorResolver> {
    resolver: &'a R,
}

impl<'a, R: GeneratorResolver> TreeWitnessBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        TreeWitnessBuilder { resolver }
    }

    /// Builds at most one tree witness for `cluster` rooted at `roots`.
    ///
    /// Returns `None` when no generator can discharge the tree part at this
    /// root choice; the caller then tries other root sets or falls back to
    /// data matching. `roots` must be drawn from the cluster's terms.
    pub fn build(
        &self,
        cluster: &[Atom],
        roots: &BTreeSet<Term>,
    ) -> Result<Option<TreeWitness>, InconsistentOntology> {
        let domain: BTreeSet<Term> = cluster.iter().flat_map(|a| a.terms()).collect();
        assert!(
            roots.is_subset(&domain),
            "candidate roots must come from the cluster's terms"
        );

        // Atoms entirely on roots must hold of the attachment point itself;
        // the rest is the tree part the anonymous element has to discharge.
        let (root_atoms, tree_part): (Vec<_>, Vec<_>) =
            cluster.iter().cloned().partition(|a| a.terms().is_subset(roots));
        if tree_part.is_empty() {
            return Ok(None);
        }

        // Every tree-part role atom pins down the generators usable at its
        // attachment root; the witness needs their intersection. Class atoms
        // on interior terms constrain the generator filler instead.
        let mut generators: Option<BTreeSet<ExistentialGenerator>> = None;
        let mut interior_concepts: BTreeSet<Concept> = BTreeSet::new();
        for atom in &tree_part {
            if atom.is_role_atom() {
                let subj = &atom.args()[0];
                let obj = &atom.args()[1];
                let role = ontorew_model::Role::new(&atom.predicate().name);
                let (role, attachment) = if roots.contains(subj) && !roots.contains(obj) {
                    (role, subj)
                } else if roots.contains(obj) && !roots.contains(subj) {
                    (role.inverted(), obj)
                } else {
                    // Both interior: this root choice cannot reach the atom
                    // from the attachment point in one step.
                    trace!(atom = %atom, "tree-part role atom touches no root");
                    return Ok(None);
                };
                let applicable = self.resolver.generators_for(&role, attachment)?;
                generators = Some(match generators {
                    None => applicable,
                    Some(acc) => acc.intersection(&applicable).cloned().collect(),
                });
                if generators.as_ref().is_some_and(|g| g.is_empty()) {
                    return Ok(None);
                }
            } else {
                debug_assert!(atom.is_class_atom());
                interior_concepts.insert(Concept::new(&atom.predicate().name));
            }
        }

        // A tree part made only of class atoms is disconnected from the roots.
        let Some(generators) = generators else {
            return Ok(None);
        };

        let generators: BTreeSet<_> = generators
            .into_iter()
            .filter(|g| interior_concepts.iter().all(|c| self.resolver.filler_entails(g, c)))
            .collect();
        if generators.is_empty() {
            return Ok(None);
        }

        // Root concepts drive mergeability; a ground individual at a root
        // rules merging out entirely.
        let root_concepts = if roots.iter().all(|r| r.is_variable()) {
            let mut acc: Option<BTreeSet<Concept>> = None;
            for root in roots {
                let cs = self.resolver.concepts_of(root)?;
                acc = Some(match acc {
                    None => cs,
                    Some(prev) => prev.intersection(&cs).cloned().collect(),
                });
            }
            RootConceptSet::new(acc.unwrap_or_default())
        } else {
            RootConceptSet::empty()
        };

        let cover = TermCover::new(domain, roots.clone());
        let witness =
            TreeWitness::new(generators, cover, root_atoms.into_iter().collect(), root_concepts);
        trace!(witness = %witness, "built candidate tree witness");
        Ok(Some(witness))
    }
}
