//! Session configuration.

use nodal_history::HistoryConfig;
use nodal_parser::ParserConfig;

/// Configuration for a [`Session`](crate::Session).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Parser limits.
    pub parser: ParserConfig,
    /// Undo log limits.
    pub history: HistoryConfig,
    /// Run an update after every successful evaluation.
    pub auto_update: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            history: HistoryConfig::default(),
            auto_update: true,
        }
    }
}

impl SessionConfig {
    /// Builder method to set the parser configuration.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Builder method to set the history configuration.
    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    /// Builder method to enable or disable updating after evaluation.
    #[must_use]
    pub const fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }
}
