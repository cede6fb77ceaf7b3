//! Linear command log with a cursor.
//!
//! Commands before the cursor have been executed; commands at or after it
//! are the redoable future, discarded when a new command is added.

use std::collections::VecDeque;
use std::time::SystemTime;

use nodal_foundation::{Error, Result};
use nodal_graph::GraphContainer;
use tracing::debug;

use crate::command::Command;

/// Configuration for the command log.
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Maximum commands kept; the oldest is dropped when full. 0 = unbounded.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 500 }
    }
}

impl HistoryConfig {
    /// Builder method to set the capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Undo/redo log of graph edits.
#[derive(Debug, Default)]
pub struct History {
    commands: VecDeque<Box<dyn Command>>,
    cursor: usize,
    config: HistoryConfig,
}

impl History {
    /// Creates an empty history with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history with the given configuration.
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            commands: VecDeque::new(),
            cursor: 0,
            config,
        }
    }

    /// Executes a command and records it at the cursor, discarding the redoable future.
    ///
    /// A command that fails to execute is not recorded.
    ///
    /// # Errors
    /// Returns the command's error.
    pub fn add_and_execute(
        &mut self,
        mut command: Box<dyn Command>,
        graph: &mut GraphContainer,
    ) -> Result<()> {
        command.execute(graph)?;
        debug!(command = %command.description(), cursor = self.cursor, "command executed");

        self.commands.truncate(self.cursor);
        self.commands.push_back(command);
        self.cursor += 1;

        if self.config.capacity > 0 && self.commands.len() > self.config.capacity {
            self.commands.pop_front();
            self.cursor -= 1;
        }
        Ok(())
    }

    /// Reverses the command before the cursor. Returns false at the start of the log.
    ///
    /// # Errors
    /// Returns the command's error; the cursor does not move in that case.
    pub fn undo(&mut self, graph: &mut GraphContainer) -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        let command = &mut self.commands[self.cursor - 1];
        command.undo(graph)?;
        debug!(command = %command.description(), "command undone");
        self.cursor -= 1;
        Ok(true)
    }

    /// Re-executes the command at the cursor. Returns false at the end of the log.
    ///
    /// # Errors
    /// Returns the command's error; the cursor does not move in that case.
    pub fn redo(&mut self, graph: &mut GraphContainer) -> Result<bool> {
        let Some(command) = self.commands.get_mut(self.cursor) else {
            return Ok(false);
        };
        command.execute(graph)?;
        debug!(command = %command.description(), "command redone");
        self.cursor += 1;
        Ok(true)
    }

    /// Undoes or redoes until the cursor reaches `position`.
    ///
    /// # Errors
    /// Returns `InvalidOperation` if `position` is past the end, or the first
    /// command error encountered.
    pub fn seek(&mut self, position: usize, graph: &mut GraphContainer) -> Result<()> {
        if position > self.commands.len() {
            return Err(Error::invalid_operation(format!(
                "history position {position} is past the end ({})",
                self.commands.len()
            )));
        }
        while self.cursor > position {
            self.undo(graph)?;
        }
        while self.cursor < position {
            self.redo(graph)?;
        }
        Ok(())
    }

    /// Empties the log.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }

    /// Returns the number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if no command is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the cursor: the number of executed commands.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true if there is a command to undo.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there is a command to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Returns the description of the command at `index`.
    #[must_use]
    pub fn description_at(&self, index: usize) -> Option<String> {
        self.commands.get(index).map(|c| c.description())
    }

    /// Returns the creation time of the command at `index`.
    #[must_use]
    pub fn timestamp_at(&self, index: usize) -> Option<SystemTime> {
        self.commands.get(index).map(|c| c.timestamp())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}
