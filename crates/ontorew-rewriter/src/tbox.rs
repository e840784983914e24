//! In-memory classified TBox.
//!
//! A table-driven [`GeneratorResolver`] implementation: generator
//! applicability, concept membership, and filler subsumption are explicit
//! tables populated up front. Real deployments plug in a reasoner; this
//! implementation backs tests and small embedded ontologies, and doubles as
//! the reference semantics for the trait contract.

use crate::error::InconsistentOntology;
use crate::resolver::GeneratorResolver;
use ontorew_model::{Concept, ExistentialGenerator, Role, Term};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct ClassifiedTbox {
    generators: BTreeMap<(Role, Term), BTreeSet<ExistentialGenerator>>,
    concepts: BTreeMap<Term, BTreeSet<Concept>>,
    /// filler concept -> concepts it entails (reflexive closure is implicit).
    subsumptions: BTreeMap<Concept, BTreeSet<Concept>>,
    inconsistent: bool,
}

impl ClassifiedTbox {
    pub fn new() -> Self {
        ClassifiedTbox::default()
    }

    /// Declares `generator` applicable when reaching `term` through `role`.
    pub fn add_generator(&mut self, role: Role, term: Term, generator: ExistentialGenerator) {
        self.generators.entry((role, term)).or_default().insert(generator);
    }

    /// Declares that `term` instantiates `concept`.
    pub fn add_concept(&mut self, term: Term, concept: Concept) {
        self.concepts.entry(term).or_default().insert(concept);
    }

    /// Declares `sub ⊑ sup`.
    pub fn add_subsumption(&mut self, sub: Concept, sup: Concept) {
        self.subsumptions.entry(sub).or_default().insert(sup);
    }

    /// Marks the TBox inconsistent; every subsequent lookup refuses to answer.
    pub fn mark_inconsistent(&mut self) {
        self.inconsistent = true;
    }

    fn check_consistent(&self) -> Result<(), InconsistentOntology> {
        if self.inconsistent {
            Err(InconsistentOntology)
        } else {
            Ok(())
        }
    }
}

impl GeneratorResolver for ClassifiedTbox {
    fn generators_for(
        &self,
        role: &Role,
        term: &Term,
    ) -> Result<BTreeSet<ExistentialGenerator>, InconsistentOntology> {
        self.check_consistent()?;
        Ok(self
            .generators
            .get(&(role.clone(), term.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn concepts_of(&self, term: &Term) -> Result<BTreeSet<Concept>, InconsistentOntology> {
        self.check_consistent()?;
        Ok(self.concepts.get(term).cloned().unwrap_or_default())
    }

    fn filler_entails(&self, generator: &ExistentialGenerator, concept: &Concept) -> bool {
        if &generator.filler == concept {
            return true;
        }
        self.subsumptions
            .get(&generator.filler)
            .map(|sups| sups.contains(concept))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lookup_is_not_an_error() {
        let tbox = ClassifiedTbox::new();
        let gens = tbox
            .generators_for(&Role::new("r"), &Term::var("x"))
            .expect("consistent tbox answers");
        assert!(gens.is_empty());
    }

    #[test]
    fn inconsistent_tbox_refuses_to_answer() {
        let mut tbox = ClassifiedTbox::new();
        tbox.mark_inconsistent();
        assert_eq!(
            tbox.generators_for(&Role::new("r"), &Term::var("x")),
            Err(InconsistentOntology)
        );
        assert_eq!(tbox.concepts_of(&Term::var("x")), Err(InconsistentOntology));
    }

    #[test]
    fn filler_entailment_follows_subsumption() {
        let mut tbox = ClassifiedTbox::new();
        tbox.add_subsumption(Concept::new("Mother"), Concept::new("Person"));
        let g = ExistentialGenerator::new(Role::new("hasParent"), Concept::new("Mother"));
        assert!(tbox.filler_entails(&g, &Concept::new("Mother")));
        assert!(tbox.filler_entails(&g, &Concept::new("Person")));
        assert!(!tbox.filler_entails(&g, &Concept::new("Dog")));
    }
}
