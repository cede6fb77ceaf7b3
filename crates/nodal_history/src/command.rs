//! Reversible graph edits.

use std::fmt;
use std::time::SystemTime;

use nodal_foundation::{Error, Result};
use nodal_graph::{GraphContainer, MemberRef, Wire, WireId};

/// A reversible structural edit.
///
/// A command keeps every piece of state it needs, so `execute` and `undo`
/// depend only on the graph they are given.
pub trait Command: fmt::Debug {
    /// Applies the edit.
    ///
    /// # Errors
    /// Returns the graph's error if the edit cannot be applied.
    fn execute(&mut self, graph: &mut GraphContainer) -> Result<()>;

    /// Reverses the edit.
    ///
    /// # Errors
    /// Returns the graph's error if the edit cannot be reversed.
    fn undo(&mut self, graph: &mut GraphContainer) -> Result<()>;

    /// Human-readable description.
    fn description(&self) -> String;

    /// When the command was created.
    fn timestamp(&self) -> SystemTime;
}

// =============================================================================
// Connect
// =============================================================================

/// Connects two members.
///
/// The first execution creates the wire; later executions re-register the
/// same wire, so a redo restores its identity.
#[derive(Clone, Debug)]
pub struct ConnectWire {
    source: MemberRef,
    target: MemberRef,
    wire: Option<Wire>,
    timestamp: SystemTime,
}

impl ConnectWire {
    /// Creates a connect command.
    #[must_use]
    pub fn new(source: MemberRef, target: MemberRef) -> Self {
        Self {
            source,
            target,
            wire: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Returns the wire, once executed.
    #[must_use]
    pub fn wire(&self) -> Option<&Wire> {
        self.wire.as_ref()
    }
}

impl Command for ConnectWire {
    fn execute(&mut self, graph: &mut GraphContainer) -> Result<()> {
        match &self.wire {
            Some(wire) => graph.reconnect(wire),
            None => {
                let id = graph.connect(self.source, self.target)?;
                self.wire = graph.wire(id).copied();
                Ok(())
            }
        }
    }

    fn undo(&mut self, graph: &mut GraphContainer) -> Result<()> {
        let wire = self
            .wire
            .ok_or_else(|| Error::invalid_operation("connect was never executed"))?;
        graph.disconnect(wire.id).map(|_| ())
    }

    fn description(&self) -> String {
        format!("Connect {} -> {}", self.source, self.target)
    }

    fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

// =============================================================================
// Disconnect
// =============================================================================

/// Removes a wire; undo puts the same wire back.
#[derive(Clone, Debug)]
pub struct DisconnectWire {
    id: WireId,
    wire: Option<Wire>,
    timestamp: SystemTime,
}

impl DisconnectWire {
    /// Creates a disconnect command.
    #[must_use]
    pub fn new(id: WireId) -> Self {
        Self {
            id,
            wire: None,
            timestamp: SystemTime::now(),
        }
    }
}

impl Command for DisconnectWire {
    fn execute(&mut self, graph: &mut GraphContainer) -> Result<()> {
        self.wire = Some(graph.disconnect(self.id)?);
        Ok(())
    }

    fn undo(&mut self, graph: &mut GraphContainer) -> Result<()> {
        let wire = self
            .wire
            .ok_or_else(|| Error::invalid_operation("disconnect was never executed"))?;
        graph.reconnect(&wire)
    }

    fn description(&self) -> String {
        match &self.wire {
            Some(wire) => format!("Disconnect {} -> {}", wire.source, wire.target),
            None => format!("Disconnect {}", self.id),
        }
    }

    fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}
