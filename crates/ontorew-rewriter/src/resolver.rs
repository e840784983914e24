//! The reasoner capability consumed by the rewriting core.

use crate::error::InconsistentOntology;
use ontorew_model::{Concept, ExistentialGenerator, Role, Term};
use std::collections::BTreeSet;

/// Lookup over a pre-classified TBox, backed by an external reasoner.
///
/// All queries are pure and deterministic for a fixed classified TBox, so a
/// resolver may be shared read-only across concurrently rewritten queries.
/// An empty result set is a normal outcome, never a failure; the only failure
/// mode is an inconsistent TBox, which the reasoner reports instead of
/// answering.
pub trait GeneratorResolver {
    /// The `∃R.B` generators able to realize an element matching `term`
    /// through `role` in the canonical model.
    fn generators_for(
        &self,
        role: &Role,
        term: &Term,
    ) -> Result<BTreeSet<ExistentialGenerator>, InconsistentOntology>;

    /// The concepts `term` is known to instantiate.
    fn concepts_of(&self, term: &Term) -> Result<BTreeSet<Concept>, InconsistentOntology>;

    /// Whether the filler of `generator` entails `concept`, i.e. whether the
    /// anonymous element the generator introduces satisfies `concept`. Used
    /// to prune generators against class atoms interior to a witness.
    fn filler_entails(&self, generator: &ExistentialGenerator, concept: &Concept) -> bool;
}
