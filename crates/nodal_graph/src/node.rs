//! Graph nodes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use nodal_foundation::Type;
use nodal_language::{Function, Operator, Signature};

use crate::ids::NodeId;
use crate::member::{Direction, Member};

/// Name of the output member of every callable node and of instructions.
pub const RESULT: &str = "result";
/// Name of the member of variables and literals.
pub const VALUE: &str = "value";

/// Kind-specific payload of a node.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Named variable holder with one `value` member.
    Variable {
        /// Identifier the variable is registered under in its scope.
        name: String,
    },
    /// Literal holder with one `value` member.
    Literal,
    /// Binary operator application.
    BinaryOperator(Arc<Operator>),
    /// Unary operator application.
    UnaryOperator(Arc<Operator>),
    /// Function application.
    Function(Arc<Function>),
    /// One parsed instruction; its `result` member receives the expression result.
    Instruction,
    /// Ordered sequence of instructions.
    CodeBlock {
        /// Instructions in source order.
        instructions: Vec<NodeId>,
    },
    /// Variable table plus ordered code blocks.
    Scope {
        /// Variables by identifier.
        variables: BTreeMap<String, NodeId>,
        /// Code blocks in creation order.
        blocks: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Returns the signature of an operator or function node.
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::BinaryOperator(op) | Self::UnaryOperator(op) => Some(&op.signature),
            Self::Function(function) => Some(&function.signature),
            _ => None,
        }
    }

    /// Returns true for nodes that compute their `result` from their inputs.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::BinaryOperator(_) | Self::UnaryOperator(_) | Self::Function(_)
        )
    }

    /// Returns true for instructions, code blocks, and scopes.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Instruction | Self::CodeBlock { .. } | Self::Scope { .. }
        )
    }

    /// Returns the nodes this node owns structurally.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::CodeBlock { instructions } => instructions.clone(),
            Self::Scope { variables, blocks } => blocks
                .iter()
                .chain(variables.values())
                .copied()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A unit of the dataflow graph.
#[derive(Clone, Debug)]
pub struct Node {
    /// Node identity.
    pub id: NodeId,
    /// Kind-specific payload.
    pub kind: NodeKind,
    /// Display label.
    pub label: String,
    /// Named value slots, in declaration order.
    pub members: Vec<Member>,
    /// Structural parent (scope or code block), if any.
    pub parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, label: impl Into<String>) -> Self {
        let members = default_members(&kind);
        let mut node = Self {
            id,
            kind,
            label: label.into(),
            members: Vec::new(),
            parent: None,
        };
        for member in members {
            node.adopt(member);
        }
        node
    }

    /// Takes ownership of a member, appending it to the member list.
    pub(crate) fn adopt(&mut self, mut member: Member) -> usize {
        member.owner = Some(self.id);
        self.members.push(member);
        self.members.len() - 1
    }

    /// Returns the slot index of the member with the given name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    /// Returns the member with the given name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Returns the slot of the output member (`result` or `value`).
    #[must_use]
    pub fn output_slot(&self) -> Option<usize> {
        self.slot(RESULT).or_else(|| self.slot(VALUE))
    }

    /// Returns the input slots in declaration order.
    pub fn input_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.direction == Direction::Input)
            .map(|(slot, _)| slot)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.label)
    }
}

fn default_members(kind: &NodeKind) -> Vec<Member> {
    match kind {
        NodeKind::Variable { .. } | NodeKind::Literal => {
            vec![Member::new(VALUE, Type::Any, Direction::InOut)]
        }
        NodeKind::Instruction => vec![Member::new(RESULT, Type::Any, Direction::InOut)],
        NodeKind::BinaryOperator(_) | NodeKind::UnaryOperator(_) | NodeKind::Function(_) => {
            let Some(signature) = kind.signature() else {
                return Vec::new();
            };
            signature
                .params()
                .iter()
                .map(|p| Member::new(p.name.clone(), p.ty, Direction::Input))
                .chain(std::iter::once(Member::new(
                    RESULT,
                    signature.return_type(),
                    Direction::Output,
                )))
                .collect()
        }
        NodeKind::CodeBlock { .. } | NodeKind::Scope { .. } => Vec::new(),
    }
}
