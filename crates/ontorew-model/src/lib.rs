//! Ontorew data model
//!
//! This crate defines the value types shared by the rewriting core and its
//! collaborators: query terms and atoms, conjunctive queries, and the ontology
//! vocabulary (concepts, roles, existential generators).
//!
//! Everything here is immutable once constructed and compares by value. The
//! types are `Ord` on purpose: the rewriting core keeps them in `BTreeSet`s so
//! that witness covers and generator sets have deterministic iteration order
//! and structural equality.

pub mod ontology;
pub mod query;
pub mod vargen;

pub use ontology::{Concept, ExistentialGenerator, Role};
pub use query::{Atom, ConjunctiveQuery, Predicate, Term, UnionOfCQs};
pub use vargen::VariableGenerator;
