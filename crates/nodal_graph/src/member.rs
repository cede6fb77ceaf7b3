//! Typed value slots.

use std::fmt;

use nodal_foundation::{Error, Result, Type, Value};

use crate::ids::NodeId;

/// Which way values may flow through a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Receives a value; may be a wire target.
    Input,
    /// Produces a value; may be a wire source.
    Output,
    /// Both; used by variables and instruction results.
    InOut,
}

impl Direction {
    /// Returns true if the member may be a wire source.
    #[must_use]
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::Output | Self::InOut)
    }

    /// Returns true if the member may be a wire target.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Input | Self::InOut)
    }
}

/// A typed value slot.
///
/// A member without an owner is a standalone literal: it is never wired,
/// only copied into the slot of the node that consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    /// Slot name (`value`, `lvalue`, `rvalue`, `arg0`, `result`, ...).
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Current value.
    pub value: Value,
    /// Flow direction.
    pub direction: Direction,
    /// Owning node, if any.
    pub owner: Option<NodeId>,
}

impl Member {
    /// Creates an unowned member holding the default value of its type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type, direction: Direction) -> Self {
        Self {
            name: name.into(),
            ty,
            value: Value::default_for(ty),
            direction,
            owner: None,
        }
    }

    /// Creates an unowned literal typed after its value.
    #[must_use]
    pub fn literal(value: Value) -> Self {
        Self {
            name: "value".to_string(),
            ty: value.value_type(),
            value,
            direction: Direction::Output,
            owner: None,
        }
    }

    /// Returns true if no node owns this member.
    #[must_use]
    pub const fn is_unowned(&self) -> bool {
        self.owner.is_none()
    }

    /// Stores a value, checking it against the declared type.
    ///
    /// `nil` is stored as the type's default.
    ///
    /// # Errors
    /// Returns `TypeMismatch` if the value's type is not accepted.
    pub fn set(&mut self, value: Value) -> Result<()> {
        if value.is_nil() {
            self.reset();
            return Ok(());
        }
        if !self.ty.accepts(value.value_type()) {
            return Err(Error::type_mismatch(self.ty, value.value_type()));
        }
        self.value = value;
        Ok(())
    }

    /// Resets the value to the type's default.
    pub fn reset(&mut self) {
        self.value = Value::default_for(self.ty);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.name, self.ty, self.value)
    }
}
