//! Caching lookup and the immutable snapshot it freezes into.

use crate::relation::{RelationDefinition, RelationId};
use crate::MetadataError;
use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

/// The source of relation definitions (typically a JDBC-style schema reader).
pub trait MetadataProvider {
    fn fetch_relation(&self, id: &RelationId) -> Result<Arc<RelationDefinition>, MetadataError>;

    /// Installs the integrity constraints of `relation`, resolving referenced
    /// relations through `lookup`. Runs once per relation during extraction.
    fn insert_integrity_constraints(
        &self,
        relation: &RelationDefinition,
        lookup: &ImmutableMetadata,
    ) -> Result<(), MetadataError>;
}

/// Mutable, build-phase-only lookup. `get_relation` is idempotent: a second
/// call with an id already seen returns the identical `Arc`.
pub struct CachingMetadataLookup<P: MetadataProvider> {
    provider: P,
    map: AHashMap<RelationId, Arc<RelationDefinition>>,
}

impl<P: MetadataProvider> CachingMetadataLookup<P> {
    pub fn new(provider: P) -> Self {
        CachingMetadataLookup { provider, map: AHashMap::new() }
    }

    /// Resolves `id`, caching the retrieved relation under every alias it
    /// declares. An alias already bound to a *different* relation is a naming
    /// clash that aborts the whole metadata build.
    pub fn get_relation(
        &mut self,
        id: &RelationId,
    ) -> Result<Arc<RelationDefinition>, MetadataError> {
        if let Some(relation) = self.map.get(id) {
            return Ok(Arc::clone(relation));
        }

        let retrieved = self.provider.fetch_relation(id)?;
        for alias in retrieved.all_ids() {
            let prev = self.map.insert(alias.clone(), Arc::clone(&retrieved));
            if let Some(prev) = prev {
                if !Arc::ptr_eq(&prev, &retrieved) {
                    return Err(MetadataError::NamingClash {
                        alias: alias.clone(),
                        requested: id.clone(),
                    });
                }
            }
        }
        debug!(relation = %retrieved.id(), aliases = retrieved.all_ids().len(), "cached relation");
        Ok(retrieved)
    }

    /// Finalizes the build: runs integrity-constraint insertion over every
    /// cached relation, then freezes the cache into a read-only structure
    /// safe for concurrent reads.
    pub fn extract_immutable_metadata(self) -> Result<ImmutableMetadata, MetadataError> {
        let metadata = ImmutableMetadata { map: self.map };
        for relation in metadata.relations() {
            self.provider.insert_integrity_constraints(&relation, &metadata)?;
        }
        Ok(metadata)
    }
}

/// Read-only metadata snapshot. Cheap to share across workers.
#[derive(Debug, Clone)]
pub struct ImmutableMetadata {
    map: AHashMap<RelationId, Arc<RelationDefinition>>,
}

impl ImmutableMetadata {
    pub fn get_relation(
        &self,
        id: &RelationId,
    ) -> Result<Arc<RelationDefinition>, MetadataError> {
        self.map
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| MetadataError::RelationNotFound(id.clone()))
    }

    /// The distinct relations of the snapshot (aliases deduplicated).
    pub fn relations(&self) -> Vec<Arc<RelationDefinition>> {
        let mut seen: Vec<Arc<RelationDefinition>> = Vec::new();
        for relation in self.map.values() {
            if !seen.iter().any(|r| Arc::ptr_eq(r, relation)) {
                seen.push(Arc::clone(relation));
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
