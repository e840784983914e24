//! Tree-witness rewriting core
//!
//! Rewrites a conjunctive query posed over a description-logic ontology into a
//! union of conjunctive queries that only mentions extensional predicates. The
//! interesting part is handling query atoms whose bound terms have no direct
//! data match: such atoms may still be satisfied by *implicit* elements of the
//! TBox canonical model. For each connected group of unmatched atoms we
//! characterize the minimal sub-query an implicit element discharges (a *tree
//! witness*), decide which witnesses may coexist in one rewriting, collapse
//! interchangeable ones, and conjoin the resulting disjunctive witness formula
//! into the rewritten query.
//!
//! The TBox itself stays behind the [`GeneratorResolver`] trait: the core only
//! sees `∃R.B` generators and concept memberships handed out by an external,
//! already-classified reasoner.
//!
//! Everything here is synchronous and free of shared mutation; independent
//! queries may be rewritten concurrently against the same (immutable) resolver.

pub mod builder;
pub mod cover;
pub mod error;
pub mod formula;
pub mod merge;
pub mod resolver;
pub mod rewrite;
pub mod tbox;
pub mod witness;

pub use builder::TreeWitnessBuilder;
pub use cover::{RootConceptSet, TermCover};
pub use error::{InconsistentOntology, RewritingError};
pub use formula::{AssembledRewriting, FormulaAssembler, RewritingFormula};
pub use merge::MergeEngine;
pub use resolver::GeneratorResolver;
pub use rewrite::{rewrite, RewriterSettings};
pub use tbox::ClassifiedTbox;
pub use witness::TreeWitness;
