//! The graph container: sole owner of nodes and wires.
//!
//! Nodes and wires live in persistent maps, so a [`GraphSnapshot`] is a cheap
//! clone and restoring one puts the registries back exactly as they were.
//! Identifier counters are not part of a snapshot; ids are never reused.

use std::collections::BTreeMap;
use std::sync::Arc;

use im::OrdMap;
use nodal_foundation::{Error, ErrorKind, Result, Value};
use nodal_language::{Function, Operator};
use tracing::debug;

use crate::ids::{MemberRef, NodeId, WireId};
use crate::member::Member;
use crate::node::{Node, NodeKind, VALUE};
use crate::wire::Wire;

/// Saved registries of a [`GraphContainer`].
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    nodes: OrdMap<NodeId, Node>,
    wires: OrdMap<WireId, Wire>,
    incoming: OrdMap<MemberRef, WireId>,
    root: NodeId,
}

/// Arena of nodes and wires with a structural mutation API.
#[derive(Clone, Debug)]
pub struct GraphContainer {
    pub(crate) nodes: OrdMap<NodeId, Node>,
    pub(crate) wires: OrdMap<WireId, Wire>,
    pub(crate) incoming: OrdMap<MemberRef, WireId>,
    root: NodeId,
    next_node: u64,
    next_wire: u64,
}

impl Default for GraphContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphContainer {
    /// Creates a container holding only an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: OrdMap::new(),
            wires: OrdMap::new(),
            incoming: OrdMap::new(),
            root: NodeId(0),
            next_node: 0,
            next_wire: 0,
        };
        graph.root = graph.new_scope();
        graph
    }

    // =========================================================================
    // Factories
    // =========================================================================

    fn insert(&mut self, kind: NodeKind, label: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let mut node = Node::new(id, kind, label);
        node.parent = parent;
        debug!(node = %node, "node created");
        self.nodes.insert(id, node);
        id
    }

    fn new_scope(&mut self) -> NodeId {
        self.insert(
            NodeKind::Scope {
                variables: BTreeMap::new(),
                blocks: Vec::new(),
            },
            "Scope",
            None,
        )
    }

    /// Creates a variable in the active scope.
    ///
    /// # Errors
    /// Returns `InvalidOperation` if the scope already has a variable of that name.
    pub fn new_variable(&mut self, name: &str) -> Result<NodeId> {
        if self.find_variable(name).is_some() {
            return Err(Error::invalid_operation(format!(
                "variable '{name}' already exists"
            )));
        }
        let scope = self.root;
        let id = self.insert(
            NodeKind::Variable {
                name: name.to_string(),
            },
            name,
            Some(scope),
        );
        if let Some(NodeKind::Scope { variables, .. }) =
            self.nodes.get_mut(&scope).map(|n| &mut n.kind)
        {
            variables.insert(name.to_string(), id);
        }
        Ok(id)
    }

    /// Looks a variable up in the active scope.
    #[must_use]
    pub fn find_variable(&self, name: &str) -> Option<NodeId> {
        match &self.nodes.get(&self.root)?.kind {
            NodeKind::Scope { variables, .. } => variables.get(name).copied(),
            _ => None,
        }
    }

    /// Creates an unowned numeric literal member.
    #[must_use]
    pub fn new_number(value: f64) -> Member {
        Member::literal(Value::Number(value))
    }

    /// Creates an unowned string literal member.
    #[must_use]
    pub fn new_string(value: &str) -> Member {
        Member::literal(Value::string(value))
    }

    /// Creates an unowned boolean literal member.
    #[must_use]
    pub fn new_boolean(value: bool) -> Member {
        Member::literal(Value::Bool(value))
    }

    /// Creates a literal node that takes over a standalone member's type and value.
    pub fn new_literal(&mut self, literal: &Member) -> NodeId {
        let id = self.insert(NodeKind::Literal, literal.value.to_string(), None);
        if let Some(member) = self.nodes.get_mut(&id).and_then(|n| n.members.first_mut()) {
            member.ty = literal.ty;
            member.value = literal.value.clone();
        }
        id
    }

    /// Creates a binary operator node with `lvalue`, `rvalue` and `result` members.
    pub fn new_binary_operator(&mut self, operator: Arc<Operator>) -> NodeId {
        let label = operator.label.clone();
        self.insert(NodeKind::BinaryOperator(operator), label, None)
    }

    /// Creates a unary operator node with `lvalue` and `result` members.
    pub fn new_unary_operator(&mut self, operator: Arc<Operator>) -> NodeId {
        let label = operator.label.clone();
        self.insert(NodeKind::UnaryOperator(operator), label, None)
    }

    /// Creates a function node with one `arg<N>` member per parameter and a `result`.
    pub fn new_function(&mut self, function: Arc<Function>) -> NodeId {
        let label = function.signature.identifier().to_string();
        self.insert(NodeKind::Function(function), label, None)
    }

    /// Creates a code block appended to the active scope.
    pub fn new_code_block(&mut self) -> NodeId {
        let scope = self.root;
        let id = self.insert(
            NodeKind::CodeBlock {
                instructions: Vec::new(),
            },
            "Block",
            Some(scope),
        );
        if let Some(NodeKind::Scope { blocks, .. }) = self.nodes.get_mut(&scope).map(|n| &mut n.kind)
        {
            blocks.push(id);
        }
        id
    }

    /// Creates an instruction appended to a code block.
    ///
    /// # Errors
    /// Returns `NodeNotFound` if the block does not exist, `InvalidOperation`
    /// if the node is not a code block.
    pub fn new_instruction(&mut self, block: NodeId) -> Result<NodeId> {
        match self.nodes.get(&block).map(|n| &n.kind) {
            Some(NodeKind::CodeBlock { .. }) => {}
            Some(_) => {
                return Err(Error::invalid_operation(format!("{block} is not a code block")));
            }
            None => return Err(Error::node_not_found(block)),
        }
        let id = self.insert(NodeKind::Instruction, "Instruction", Some(block));
        if let Some(NodeKind::CodeBlock { instructions }) =
            self.nodes.get_mut(&block).map(|n| &mut n.kind)
        {
            instructions.push(id);
        }
        Ok(id)
    }

    // =========================================================================
    // Wires
    // =========================================================================

    /// Connects a source member to a target member.
    ///
    /// # Errors
    /// - `NodeNotFound` / `MemberNotFound` if an endpoint does not exist
    /// - `InvalidConnection` for a self-loop, a wrong direction, or incompatible types
    /// - `TargetAlreadyConnected` if the target already has an incoming wire
    pub fn connect(&mut self, source: MemberRef, target: MemberRef) -> Result<WireId> {
        self.check_connection(source, target)?;
        let id = WireId(self.next_wire);
        self.next_wire += 1;
        self.register(Wire { id, source, target });
        Ok(id)
    }

    /// Re-registers a previously disconnected wire under its original identity.
    ///
    /// # Errors
    /// Fails like [`connect`](Self::connect), or with `InvalidConnection` if
    /// the wire id is still registered.
    pub fn reconnect(&mut self, wire: &Wire) -> Result<()> {
        if self.wires.contains_key(&wire.id) {
            return Err(Error::invalid_connection(format!(
                "{} is already connected",
                wire.id
            )));
        }
        self.check_connection(wire.source, wire.target)?;
        self.next_wire = self.next_wire.max(wire.id.0 + 1);
        self.register(*wire);
        Ok(())
    }

    fn register(&mut self, wire: Wire) {
        debug!(wire = %wire, "wire connected");
        self.incoming.insert(wire.target, wire.id);
        self.wires.insert(wire.id, wire);
    }

    fn check_connection(&self, source: MemberRef, target: MemberRef) -> Result<()> {
        if source.node == target.node {
            return Err(Error::invalid_connection(format!(
                "{source} and {target} belong to the same node"
            )));
        }
        let from = self.member(source)?;
        let to = self.member(target)?;
        if !from.direction.is_readable() {
            return Err(Error::invalid_connection(format!(
                "{source} ({}) cannot be a wire source",
                from.name
            )));
        }
        if !to.direction.is_writable() {
            return Err(Error::invalid_connection(format!(
                "{target} ({}) cannot be a wire target",
                to.name
            )));
        }
        if !to.ty.accepts(from.ty) {
            return Err(Error::invalid_connection(format!(
                "{} does not accept {}",
                to.ty, from.ty
            )));
        }
        if self.incoming.contains_key(&target) {
            return Err(Error::new(ErrorKind::TargetAlreadyConnected(
                target.to_string(),
            )));
        }
        Ok(())
    }

    /// Removes a wire and resets its target to the unconnected default.
    ///
    /// # Errors
    /// Returns `WireNotFound` if the wire is not registered.
    pub fn disconnect(&mut self, id: WireId) -> Result<Wire> {
        let wire = self.wires.remove(&id).ok_or_else(|| Error::wire_not_found(id))?;
        self.incoming.remove(&wire.target);
        if let Some(member) = self
            .nodes
            .get_mut(&wire.target.node)
            .and_then(|n| n.members.get_mut(wire.target.slot))
        {
            member.reset();
        }
        debug!(wire = %wire, "wire disconnected");
        Ok(wire)
    }

    /// Returns the wire driving a member, if any.
    #[must_use]
    pub fn incoming_wire(&self, member: MemberRef) -> Option<&Wire> {
        self.incoming.get(&member).and_then(|id| self.wires.get(id))
    }

    /// Returns every wire with an endpoint on the given node.
    #[must_use]
    pub fn wires_of(&self, node: NodeId) -> Vec<Wire> {
        self.wires
            .values()
            .filter(|w| w.touches(node))
            .copied()
            .collect()
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroys a node, its structural children, and every wire touching them.
    ///
    /// # Errors
    /// Returns `NodeNotFound` for an unknown node and `InvalidOperation` for the root scope.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::invalid_operation("the root scope cannot be destroyed"));
        }
        let node = self.nodes.get(&id).ok_or_else(|| Error::node_not_found(id))?;
        let children = node.kind.children();
        let parent = node.parent;

        for child in children {
            self.destroy_node(child)?;
        }
        for wire in self.wires_of(id) {
            self.disconnect(wire.id)?;
        }
        if let Some(parent) = parent {
            self.detach(parent, id);
        }
        if let Some(node) = self.nodes.remove(&id) {
            debug!(node = %node, "node destroyed");
        }
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let Some(node) = self.nodes.get_mut(&parent) else {
            return;
        };
        match &mut node.kind {
            NodeKind::CodeBlock { instructions } => instructions.retain(|i| *i != child),
            NodeKind::Scope { variables, blocks } => {
                blocks.retain(|b| *b != child);
                variables.retain(|_, v| *v != child);
            }
            _ => {}
        }
    }

    /// Removes everything and starts over with a fresh root scope.
    pub fn clear(&mut self) {
        self.nodes = OrdMap::new();
        self.wires = OrdMap::new();
        self.incoming = OrdMap::new();
        self.root = self.new_scope();
        debug!("graph cleared");
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Captures the node and wire registries.
    #[must_use]
    pub fn checkpoint(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            wires: self.wires.clone(),
            incoming: self.incoming.clone(),
            root: self.root,
        }
    }

    /// Puts the registries back to a captured state.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.nodes = snapshot.nodes;
        self.wires = snapshot.wires;
        self.incoming = snapshot.incoming;
        self.root = snapshot.root;
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Returns the root scope.
    #[must_use]
    pub const fn root_scope(&self) -> NodeId {
        self.root
    }

    /// Returns a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns all live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns a wire.
    #[must_use]
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    /// Returns all live wires in creation order.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    /// Returns the number of live nodes, the root scope included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of live wires.
    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Returns a member.
    ///
    /// # Errors
    /// Returns `NodeNotFound` or `MemberNotFound`.
    pub fn member(&self, member: MemberRef) -> Result<&Member> {
        self.nodes
            .get(&member.node)
            .ok_or_else(|| Error::node_not_found(member.node))?
            .members
            .get(member.slot)
            .ok_or_else(|| Error::member_not_found(member))
    }

    /// Resolves a member by node and name.
    ///
    /// # Errors
    /// Returns `NodeNotFound` or `MemberNotFound`.
    pub fn member_ref(&self, node: NodeId, name: &str) -> Result<MemberRef> {
        let slot = self
            .nodes
            .get(&node)
            .ok_or_else(|| Error::node_not_found(node))?
            .slot(name)
            .ok_or_else(|| Error::member_not_found(format!("{node}.{name}")))?;
        Ok(MemberRef::new(node, slot))
    }

    /// Returns the `value` member of a variable.
    #[must_use]
    pub fn variable_member(&self, variable: NodeId) -> Option<MemberRef> {
        match self.nodes.get(&variable)?.kind {
            NodeKind::Variable { .. } => self.member_ref(variable, VALUE).ok(),
            _ => None,
        }
    }

    /// Stores a value in a member.
    ///
    /// # Errors
    /// Returns `NodeNotFound`, `MemberNotFound`, or `TypeMismatch`.
    pub fn set_member_value(&mut self, member: MemberRef, value: Value) -> Result<()> {
        self.nodes
            .get_mut(&member.node)
            .ok_or_else(|| Error::node_not_found(member.node))?
            .members
            .get_mut(member.slot)
            .ok_or_else(|| Error::member_not_found(member))?
            .set(value)
    }
}
