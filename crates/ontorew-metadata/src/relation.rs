//! Relation definitions and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A relation identifier as the mapping layer writes it, e.g. `person` or
/// `public.person`. Value identity; a relation may declare several of these
/// as aliases of the same physical relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationId(String);

impl RelationId {
    pub fn new(id: impl Into<String>) -> Self {
        RelationId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        RelationId::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
}

/// An immutable description of one physical relation.
///
/// Shared by `Arc` so that repeated lookups hand out the identical object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDefinition {
    id: RelationId,
    /// Every identifier this relation answers to, the canonical one included.
    all_ids: Vec<RelationId>,
    attributes: Vec<Attribute>,
}

impl RelationDefinition {
    pub fn new(id: RelationId, all_ids: Vec<RelationId>, attributes: Vec<Attribute>) -> Self {
        assert!(
            all_ids.contains(&id),
            "a relation's canonical id must be among its declared ids"
        );
        RelationDefinition { id, all_ids, attributes }
    }

    pub fn id(&self) -> &RelationId {
        &self.id
    }

    pub fn all_ids(&self) -> &[RelationId] {
        &self.all_ids
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn canonical_id_must_be_declared() {
        RelationDefinition::new(
            RelationId::new("person"),
            vec![RelationId::new("public.person")],
            vec![],
        );
    }
}
