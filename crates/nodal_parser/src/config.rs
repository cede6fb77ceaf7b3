//! Parser configuration.

/// Limits applied while parsing.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Maximum expression nesting. Deeper input fails with `DepthExceeded`.
    ///
    /// Brackets, call arguments, and the right operand of a tighter-binding
    /// operator each add one level. Operators chained at the same level do not.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl ParserConfig {
    /// Builder method to set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
