//! Type descriptors for signature matching.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of a member slot or signature parameter.
///
/// `Any` stands both for "accepts everything" (in a parameter) and for
/// "not resolved yet" (in an argument, e.g. a variable that was never assigned).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Any type (accepts any value).
    #[default]
    Any,
    /// Boolean type.
    Bool,
    /// 64-bit floating point number.
    Number,
    /// String type.
    String,
}

impl Type {
    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }

    /// Checks whether an argument of type `arg` can be bound to a parameter of this type.
    ///
    /// - An `Any` parameter accepts every argument.
    /// - An `Any` argument (unresolved) is accepted by every parameter.
    /// - Otherwise the types must be equal; there is no numeric widening.
    #[must_use]
    pub fn accepts(self, arg: Type) -> bool {
        self.is_any() || arg.is_any() || self == arg
    }

    /// Scores how well `arg` binds to a parameter of this type.
    ///
    /// Returns `None` when the argument is not accepted, `Some(2)` for an exact
    /// concrete match and `Some(1)` for a match through `Any` on either side.
    #[must_use]
    pub fn match_score(self, arg: Type) -> Option<u32> {
        if !self.accepts(arg) {
            None
        } else if self == arg && !self.is_any() {
            Some(2)
        } else {
            Some(1)
        }
    }

    /// Returns the human-readable name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
