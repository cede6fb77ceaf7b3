//! Directed edges between members.

use std::fmt;

use crate::ids::{MemberRef, NodeId, WireId};

/// A directed edge: the target member follows the source member's value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Wire {
    /// Wire identity.
    pub id: WireId,
    /// Member the value flows from.
    pub source: MemberRef,
    /// Member the value flows into.
    pub target: MemberRef,
}

impl Wire {
    /// Returns true if either endpoint belongs to the given node.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.target.node == node
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.source, self.target)
    }
}
