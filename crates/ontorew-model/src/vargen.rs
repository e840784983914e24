//! Fresh-variable generation.
//!
//! The formula assembler introduces one fresh existential variable per tree
//! witness; the generator is seeded with every variable already in scope so a
//! fresh name can never capture a query variable.

use crate::query::Term;
use std::collections::BTreeSet;

/// Supplies variables guaranteed not to collide with a known set.
#[derive(Debug, Clone)]
pub struct VariableGenerator {
    count: u32,
    known: BTreeSet<String>,
}

const SUFFIX_PREFIX: &str = "w";

impl VariableGenerator {
    /// Seeds the generator with the variables of `terms`; individuals in the
    /// input are ignored (they live in a different namespace).
    pub fn new<'a>(terms: impl IntoIterator<Item = &'a Term>) -> Self {
        let known = terms
            .into_iter()
            .filter(|t| t.is_variable())
            .map(|t| t.name().to_owned())
            .collect();
        VariableGenerator { count: 0, known }
    }

    /// Declares additional variables as known.
    pub fn register<'a>(&mut self, terms: impl IntoIterator<Item = &'a Term>) {
        self.known
            .extend(terms.into_iter().filter(|t| t.is_variable()).map(|t| t.name().to_owned()));
    }

    /// Returns a fresh variable, distinct from everything seen so far.
    pub fn fresh(&mut self) -> Term {
        loop {
            let candidate = format!("{SUFFIX_PREFIX}{}", self.count);
            self.count += 1;
            if self.known.insert(candidate.clone()) {
                return Term::Variable(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_skips_seeded_names() {
        let seed = [Term::var("w0"), Term::var("x")];
        let mut gen = VariableGenerator::new(seed.iter());
        let v = gen.fresh();
        assert_eq!(v, Term::var("w1"));
    }

    #[test]
    fn fresh_never_repeats() {
        let mut gen = VariableGenerator::new(std::iter::empty());
        let a = gen.fresh();
        let b = gen.fresh();
        assert_ne!(a, b);
    }
}
