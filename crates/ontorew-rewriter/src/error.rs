//! Error types of the rewriting core.
//!
//! Only reasoner failures surface as errors: an empty generator set is a
//! normal outcome ("no tree witness here"), and internal invariant breaches
//! are programming errors that fail fast with `assert!` rather than being
//! converted into recoverable results.

use thiserror::Error;

/// Raised by the reasoner collaborator when the TBox is inconsistent.
///
/// The core never raises this itself; it propagates it and produces no
/// partial rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ontology is inconsistent; no rewriting is possible")]
pub struct InconsistentOntology;

/// Failure of a whole rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewritingError {
    #[error(transparent)]
    OntologyInconsistency(#[from] InconsistentOntology),
}
