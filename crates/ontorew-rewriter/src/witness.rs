//! Tree witnesses.
//!
//! A tree witness describes a finite sub-tree of the TBox canonical model that
//! can satisfy part of a query beyond what stored data directly matches. It is
//! determined by its term cover, the `∃R.B` generators able to realize it, the
//! query atoms living entirely on its roots, and (for merging) the concepts
//! all roots instantiate.
//!
//! The *tree-witness part* of the query — atoms with all terms in the domain
//! and at least one term outside the roots — is not stored; it is re-derived
//! from the originating query via [`TreeWitness::tree_part_of`].

use crate::cover::{RootConceptSet, TermCover};
use crate::formula::RewritingFormula;
use ontorew_model::{Atom, ConjunctiveQuery, ExistentialGenerator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeWitness {
    generators: BTreeSet<ExistentialGenerator>,
    cover: TermCover,
    root_atoms: BTreeSet<Atom>,
    root_concepts: RootConceptSet,
    /// Set exactly once, by the formula assembler.
    formula: Option<RewritingFormula>,
}

impl TreeWitness {
    /// Invariant: every root atom has all its terms among the cover's roots.
    pub fn new(
        generators: BTreeSet<ExistentialGenerator>,
        cover: TermCover,
        root_atoms: BTreeSet<Atom>,
        root_concepts: RootConceptSet,
    ) -> Self {
        for atom in &root_atoms {
            assert!(
                atom.terms().is_subset(cover.roots()),
                "root atom {atom} mentions a non-root term"
            );
        }
        TreeWitness { generators, cover, root_atoms, root_concepts, formula: None }
    }

    pub fn generators(&self) -> &BTreeSet<ExistentialGenerator> {
        &self.generators
    }

    pub fn cover(&self) -> &TermCover {
        &self.cover
    }

    pub fn root_atoms(&self) -> &BTreeSet<Atom> {
        &self.root_atoms
    }

    pub fn root_concepts(&self) -> &RootConceptSet {
        &self.root_concepts
    }

    pub fn formula(&self) -> Option<&RewritingFormula> {
        self.formula.as_ref()
    }

    /// Attaches the witness formula. Calling this twice is a driver bug.
    pub(crate) fn set_formula(&mut self, formula: RewritingFormula) {
        assert!(self.formula.is_none(), "tree-witness formula set twice");
        self.formula = Some(formula);
    }

    /// All root terms are quantified variables and the root-concept
    /// intersection is non-empty.
    pub fn is_mergeable(&self) -> bool {
        !self.root_concepts.is_empty()
    }

    /// Whether this witness and `other` may be used together in one rewriting:
    /// their domains may intersect only on terms that are roots of *both*.
    ///
    /// Symmetric by construction. Checking a witness against itself is a
    /// precondition violation.
    pub fn is_compatible_with(&self, other: &TreeWitness) -> bool {
        assert!(
            !std::ptr::eq(self, other),
            "compatibility is only defined between distinct tree witnesses"
        );
        let shared: BTreeSet<_> =
            self.cover.domain().intersection(other.cover.domain()).collect();
        if shared.is_empty() {
            return true;
        }
        shared
            .iter()
            .all(|t| self.cover.roots().contains(t) && other.cover.roots().contains(t))
    }

    /// The atoms of `query` this witness discharges: all terms within the
    /// domain and at least one term outside the roots.
    pub fn tree_part_of(&self, query: &ConjunctiveQuery) -> Vec<Atom> {
        query
            .atoms
            .iter()
            .filter(|a| {
                let ts = a.terms();
                ts.is_subset(self.cover.domain()) && !ts.is_subset(self.cover.roots())
            })
            .cloned()
            .collect()
    }
}

impl fmt::Display for TreeWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree witness generated by {{")?;
        for (i, g) in self.generators.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{g}")?;
        }
        write!(f, "}} with {}", self.cover)
    }
}
