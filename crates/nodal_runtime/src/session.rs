//! A language, a parser, a graph, and the undo log that edits it.

use std::sync::Arc;

use nodal_foundation::{Error, Result, Value};
use nodal_graph::{GraphContainer, MemberRef, NodeId, RESULT, UpdateReport, WireId};
use nodal_history::{ConnectWire, DisconnectWire, History};
use nodal_language::Language;
use nodal_parser::{EvalReport, Parser};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;

/// Evaluation context shared by the REPL and the CLI.
///
/// Every evaluation adds a code block to the same graph, so variables assigned
/// by one call are visible to the next.
#[derive(Debug)]
pub struct Session {
    language: Arc<Language>,
    parser: Parser,
    graph: GraphContainer,
    history: History,
    config: SessionConfig,
}

impl Session {
    /// Creates a session over the standard language.
    ///
    /// # Errors
    /// Returns an error if the standard language fails to build.
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session over the standard language with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the standard language fails to build.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        Ok(Self::with_language(Arc::new(Language::standard()?), config))
    }

    /// Creates a session over an arbitrary language.
    #[must_use]
    pub fn with_language(language: Arc<Language>, config: SessionConfig) -> Self {
        info!(language = language.name(), "session started");
        Self {
            parser: Parser::with_config(Arc::clone(&language), config.parser.clone()),
            history: History::with_config(config.history.clone()),
            graph: GraphContainer::new(),
            language,
            config,
        }
    }

    /// Parses `code` into the graph and returns the value of each instruction.
    ///
    /// With `auto_update` off, the values are the ones known at parse time.
    ///
    /// # Errors
    /// Returns any parse error or, with `auto_update` on, any update error.
    /// Either way the graph is left as it was before the call.
    pub fn eval(&mut self, code: &str) -> Result<Vec<Value>> {
        let report = self.eval_report(code)?;
        self.instruction_values(&report)
    }

    /// Parses `code` into the graph and returns the created nodes.
    ///
    /// # Errors
    /// See [`Session::eval`].
    pub fn eval_report(&mut self, code: &str) -> Result<EvalReport> {
        let before = self.graph.checkpoint();
        let report = self.parser.eval_code_into_container(code, &mut self.graph)?;
        if self.config.auto_update {
            if let Err(error) = self.graph.update() {
                warn!(error = %error, "update failed, discarding evaluation");
                self.graph.restore(before);
                return Err(error);
            }
        }
        Ok(report)
    }

    /// Returns the current `result` value of each instruction in `report`.
    ///
    /// # Errors
    /// Returns `NodeNotFound` if an instruction has since been deleted.
    pub fn instruction_values(&self, report: &EvalReport) -> Result<Vec<Value>> {
        report
            .instructions
            .iter()
            .map(|id| {
                let member = self.graph.member_ref(*id, RESULT)?;
                Ok(self.graph.member(member)?.value.clone())
            })
            .collect()
    }

    /// Propagates values through the graph.
    ///
    /// # Errors
    /// Returns `CycleDetected` or the first evaluation error.
    pub fn update(&mut self) -> Result<UpdateReport> {
        self.graph.update()
    }

    /// Connects two members and records the edit in the history.
    ///
    /// # Errors
    /// Returns the graph's connection error; nothing is recorded in that case.
    pub fn connect(&mut self, source: MemberRef, target: MemberRef) -> Result<WireId> {
        self.history
            .add_and_execute(Box::new(ConnectWire::new(source, target)), &mut self.graph)?;
        self.graph
            .incoming_wire(target)
            .map(|wire| wire.id)
            .ok_or_else(|| Error::wire_not_found(target))
    }

    /// Removes a wire and records the edit in the history.
    ///
    /// # Errors
    /// Returns `WireNotFound` if the wire does not exist.
    pub fn disconnect(&mut self, wire: WireId) -> Result<()> {
        self.history
            .add_and_execute(Box::new(DisconnectWire::new(wire)), &mut self.graph)
    }

    /// Destroys a node, its children, and every wire touching them.
    ///
    /// Deletion is not recorded. Recorded commands that touch the node fail
    /// when undone or redone.
    ///
    /// # Errors
    /// Returns `NodeNotFound`, or `InvalidOperation` for the root scope.
    pub fn delete_node(&mut self, node: NodeId) -> Result<()> {
        self.graph.destroy_node(node)
    }

    /// Undoes the last recorded edit. Returns false if there is none.
    ///
    /// # Errors
    /// Returns the command's error.
    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo(&mut self.graph)
    }

    /// Redoes the next recorded edit. Returns false if there is none.
    ///
    /// # Errors
    /// Returns the command's error.
    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo(&mut self.graph)
    }

    /// Empties the graph and the history.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.history.clear();
        debug!("session cleared");
    }

    /// Returns the graph.
    #[must_use]
    pub fn graph(&self) -> &GraphContainer {
        &self.graph
    }

    /// Returns the undo log.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the language.
    #[must_use]
    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
