//! Relation-metadata lookup
//!
//! The mapping layer resolves physical relation identity through this crate.
//! Metadata extraction is a one-time, single-threaded build phase: a caching
//! lookup pulls relation definitions from a provider, registers every alias id
//! a relation declares, and fails fatally on a naming clash. Once the build is
//! done the cache is frozen into an immutable snapshot that is safe for
//! concurrent reads; nothing is mutated afterwards.

pub mod cache;
pub mod relation;

pub use cache::{CachingMetadataLookup, ImmutableMetadata, MetadataProvider};
pub use relation::{Attribute, RelationDefinition, RelationId};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Two distinct relation identifiers resolve to different relation
    /// objects. Fatal for the whole metadata build.
    #[error("clashing relation IDs: {alias} and {requested}")]
    NamingClash { alias: RelationId, requested: RelationId },

    #[error("relation {0} not found")]
    RelationNotFound(RelationId),

    #[error("integrity-constraint insertion failed for {relation}: {reason}")]
    IntegrityConstraint { relation: RelationId, reason: String },
}
