//! Query terms, atoms, and conjunctive queries.
//!
//! A query is a conjunction of atoms over class (unary) and role (binary)
//! predicates. Terms are either quantified variables or ground individuals;
//! the distinction matters for tree-witness mergeability, where only
//! existentially quantified roots may be merged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A query term: a variable or a ground individual. Value identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(String),
    Individual(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn individual(name: impl Into<String>) -> Self {
        Term::Individual(name.into())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Term::Variable(n) | Term::Individual(n) => n,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(n) => write!(f, "?{n}"),
            Term::Individual(n) => write!(f, "<{n}>"),
        }
    }
}

/// A predicate symbol with its arity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
}

impl Predicate {
    pub fn class(name: impl Into<String>) -> Self {
        Predicate { name: name.into(), arity: 1 }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Predicate { name: name.into(), arity: 2 }
    }
}

/// A predicate applied to an ordered sequence of terms.
///
/// Immutable once constructed. The constructor checks the argument count
/// against the predicate arity; a mismatch is a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Atom {
    predicate: Predicate,
    args: Vec<Term>,
}

impl Atom {
    pub fn new(predicate: Predicate, args: Vec<Term>) -> Self {
        assert_eq!(
            predicate.arity,
            args.len(),
            "atom {} applied to {} arguments",
            predicate.name,
            args.len()
        );
        Atom { predicate, args }
    }

    /// Unary class atom `C(t)`.
    pub fn class(name: impl Into<String>, t: Term) -> Self {
        Atom::new(Predicate::class(name), vec![t])
    }

    /// Binary role atom `R(s, t)`.
    pub fn role(name: impl Into<String>, s: Term, t: Term) -> Self {
        Atom::new(Predicate::role(name), vec![s, t])
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn is_class_atom(&self) -> bool {
        self.predicate.arity == 1
    }

    pub fn is_role_atom(&self) -> bool {
        self.predicate.arity == 2
    }

    /// The distinct terms of this atom.
    pub fn terms(&self) -> BTreeSet<Term> {
        self.args.iter().cloned().collect()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate.name)?;
        for (i, t) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, ")")
    }
}

/// A conjunctive query: answer variables plus a conjunction of atoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjunctiveQuery {
    pub answer_vars: Vec<Term>,
    pub atoms: Vec<Atom>,
}

impl ConjunctiveQuery {
    pub fn new(answer_vars: Vec<Term>, atoms: Vec<Atom>) -> Self {
        ConjunctiveQuery { answer_vars, atoms }
    }

    /// All distinct terms occurring in the query body.
    pub fn terms(&self) -> BTreeSet<Term> {
        self.atoms.iter().flat_map(|a| a.terms()).collect()
    }
}

impl fmt::Display for ConjunctiveQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q(")?;
        for (i, v) in self.answer_vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ") :- ")?;
        for (i, a) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        Ok(())
    }
}

/// A union of conjunctive queries, the target normal form of rewriting.
///
/// Disjunct order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionOfCQs {
    pub disjuncts: Vec<ConjunctiveQuery>,
}

impl UnionOfCQs {
    pub fn new(disjuncts: Vec<ConjunctiveQuery>) -> Self {
        UnionOfCQs { disjuncts }
    }

    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }
}
