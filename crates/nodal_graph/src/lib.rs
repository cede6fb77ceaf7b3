//! Dataflow graph container for Nodal.
//!
//! This crate provides:
//! - [`GraphContainer`] - Arena owning every node and wire
//! - [`Node`] / [`NodeKind`] - Closed set of node variants
//! - [`Member`] - Typed value slots exposed by nodes
//! - [`Wire`] - Directed edges between members
//!
//! Nodes and wires are referenced only through [`NodeId`], [`WireId`] and
//! [`MemberRef`] handles, never by pointer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod container;
pub mod ids;
pub mod member;
pub mod node;
mod update;
pub mod wire;

pub use container::{GraphContainer, GraphSnapshot};
pub use ids::{MemberRef, NodeId, WireId};
pub use member::{Direction, Member};
pub use node::{Node, NodeKind, RESULT, VALUE};
pub use update::UpdateReport;
pub use wire::Wire;
