//! Ontology vocabulary: concepts, roles, and existential generators.
//!
//! The rewriting core never inspects TBox axioms directly; it sees the
//! classified TBox only through `∃R.B` generators handed out by the reasoner.
//! These are value types referenced by identity and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
}

impl Concept {
    pub fn new(name: impl Into<String>) -> Self {
        Concept { name: name.into() }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named property, possibly inverted.
///
/// The inverse is needed when a tree-witness attachment term occupies the
/// object position of a role atom: `R(y, t)` constrains `t` through `R⁻`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub inverse: bool,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Role { name: name.into(), inverse: false }
    }

    /// `R⁻` for `R`, and `R` for `R⁻`.
    pub fn inverted(&self) -> Self {
        Role { name: self.name.clone(), inverse: !self.inverse }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{}⁻", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An existential generator `∃R.B`: one way the canonical model can attach an
/// anonymous `R`-successor that is a `B`.
///
/// Produced and owned by the reasoner; the core only stores and compares them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExistentialGenerator {
    pub role: Role,
    pub filler: Concept,
}

impl ExistentialGenerator {
    pub fn new(role: Role, filler: Concept) -> Self {
        ExistentialGenerator { role, filler }
    }
}

impl fmt::Display for ExistentialGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "∃{}.{}", self.role, self.filler)
    }
}
