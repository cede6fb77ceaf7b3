//! Value propagation along wires.

use std::collections::{BTreeMap, VecDeque};

use nodal_foundation::{Error, ErrorContext, Result, Value};
use tracing::{debug, warn};

use crate::container::GraphContainer;
use crate::ids::{MemberRef, NodeId};
use crate::node::NodeKind;

/// Outcome of one update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Number of nodes visited in dependency order.
    pub evaluated: usize,
}

impl GraphContainer {
    /// Propagates values from sources to dependents.
    ///
    /// Nodes are visited in topological order of the wire graph: every node
    /// pulls the values of its wired members, then operators and functions
    /// recompute their `result`.
    ///
    /// # Errors
    /// Returns `CycleDetected` if the wires form a cycle; nothing is evaluated
    /// in that case. Errors raised by an operator or function body end the pass.
    pub fn update(&mut self) -> Result<UpdateReport> {
        let order = self.topological_order()?;
        for id in &order {
            self.pull_inputs(*id)?;
            self.evaluate(*id)?;
        }
        debug!(nodes = order.len(), "graph updated");
        Ok(UpdateReport {
            evaluated: order.len(),
        })
    }

    fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut pending: BTreeMap<NodeId, usize> = self.nodes.keys().map(|id| (*id, 0)).collect();
        let mut dependents: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for wire in self.wires.values() {
            *pending.entry(wire.target.node).or_default() += 1;
            dependents
                .entry(wire.source.node)
                .or_default()
                .push(wire.target.node);
        }

        let mut ready: VecDeque<NodeId> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(pending.len());
        while let Some(id) = ready.pop_front() {
            order.push(id);
            for next in dependents.get(&id).into_iter().flatten() {
                if let Some(count) = pending.get_mut(next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(*next);
                    }
                }
            }
        }

        if order.len() < pending.len() {
            let node = pending
                .iter()
                .find(|(_, count)| **count > 0)
                .map_or_else(|| "?".to_string(), |(id, _)| id.to_string());
            warn!(%node, "cycle detected during update");
            return Err(Error::cycle_detected(node));
        }
        Ok(order)
    }

    fn pull_inputs(&mut self, id: NodeId) -> Result<()> {
        let Some(node) = self.nodes.get(&id) else {
            return Ok(());
        };
        let pulls: Vec<(usize, Value)> = (0..node.members.len())
            .filter_map(|slot| {
                let wire = self.incoming_wire(MemberRef::new(id, slot))?;
                let value = self.member(wire.source).ok()?.value.clone();
                Some((slot, value))
            })
            .collect();
        if pulls.is_empty() {
            return Ok(());
        }

        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        let frame = node.to_string();
        for (slot, value) in pulls {
            if let Some(member) = node.members.get_mut(slot) {
                member
                    .set(value)
                    .map_err(|e| e.with_context(ErrorContext::new().with_frame(frame.clone())))?;
            }
        }
        Ok(())
    }

    fn evaluate(&mut self, id: NodeId) -> Result<()> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        let body = match &node.kind {
            NodeKind::BinaryOperator(op) | NodeKind::UnaryOperator(op) => op.body,
            NodeKind::Function(function) => function.body,
            _ => return Ok(()),
        };
        let args: Vec<Value> = node
            .input_slots()
            .map(|slot| node.members[slot].value.clone())
            .collect();
        let frame = node.to_string();
        body(&args)
            .and_then(|value| match node.output_slot() {
                Some(slot) => node.members[slot].set(value),
                None => Ok(()),
            })
            .map_err(|e| {
                warn!(node = %frame, error = %e, "evaluation failed");
                e.with_context(ErrorContext::new().with_frame(frame.clone()))
            })
    }
}
