//! Numeric identifiers assigned by the stake snapshot registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity being voted on — a migration target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(u32);

impl SubjectId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject-{}", self.0)
    }
}

/// A registry-assigned voter identity.
///
/// Principals are resolved to voter ids by the stake snapshot before any
/// weight lookup; an unresolvable principal is rejected at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterId(u32);

impl VoterId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voter-{}", self.0)
    }
}
