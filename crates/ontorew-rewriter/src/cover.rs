//! Term covers and root-concept sets.

use ontorew_model::{Concept, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The term cover of a tree witness: its domain (all terms it accounts for)
/// and its roots (the terms mapped onto the canonical-model attachment point).
///
/// Structural equality over both sets; used to deduplicate candidate witnesses
/// and to key the merge pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermCover {
    domain: BTreeSet<Term>,
    roots: BTreeSet<Term>,
}

impl TermCover {
    /// Invariant: `roots ⊆ domain`. A violation is a driver bug.
    pub fn new(domain: BTreeSet<Term>, roots: BTreeSet<Term>) -> Self {
        assert!(
            roots.is_subset(&domain),
            "term cover roots must be a subset of its domain"
        );
        TermCover { domain, roots }
    }

    pub fn domain(&self) -> &BTreeSet<Term> {
        &self.domain
    }

    pub fn roots(&self) -> &BTreeSet<Term> {
        &self.roots
    }

    /// Terms strictly inside the witness (domain minus roots).
    pub fn interior(&self) -> BTreeSet<Term> {
        self.domain.difference(&self.roots).cloned().collect()
    }
}

impl fmt::Display for TermCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain {{")?;
        for (i, t) in self.domain.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, "}} with roots {{")?;
        for (i, t) in self.roots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, "}}")
    }
}

/// The concepts every root term of a witness is known to instantiate.
///
/// Only used to test mergeability: a non-empty intersection means two
/// witnesses with the same cover are interchangeable and may be collapsed.
/// The empty set means "not mergeable" (in particular, any witness rooted at
/// a ground individual).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConceptSet(BTreeSet<Concept>);

impl RootConceptSet {
    pub fn new(concepts: BTreeSet<Concept>) -> Self {
        RootConceptSet(concepts)
    }

    pub fn empty() -> Self {
        RootConceptSet(BTreeSet::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn concepts(&self) -> &BTreeSet<Concept> {
        &self.0
    }

    pub fn intersect(&self, other: &RootConceptSet) -> RootConceptSet {
        RootConceptSet(self.0.intersection(&other.0).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(names: &[&str]) -> BTreeSet<Term> {
        names.iter().map(|n| Term::var(*n)).collect()
    }

    #[test]
    fn roots_within_domain_is_enforced() {
        let cover = TermCover::new(terms(&["x", "y"]), terms(&["x"]));
        assert!(cover.roots().is_subset(cover.domain()));
        assert_eq!(cover.interior(), terms(&["y"]));
    }

    #[test]
    #[should_panic]
    fn roots_outside_domain_panics() {
        TermCover::new(terms(&["x"]), terms(&["z"]));
    }

    #[test]
    fn equal_covers_compare_equal() {
        let a = TermCover::new(terms(&["x", "y"]), terms(&["x"]));
        let b = TermCover::new(terms(&["y", "x"]), terms(&["x"]));
        assert_eq!(a, b);
    }

    #[test]
    fn root_concept_intersection() {
        let c = |n: &str| Concept::new(n);
        let a = RootConceptSet::new([c("Person"), c("Agent")].into());
        let b = RootConceptSet::new([c("Agent")].into());
        assert_eq!(a.intersect(&b), RootConceptSet::new([c("Agent")].into()));
        assert!(a.intersect(&RootConceptSet::empty()).is_empty());
    }
}
