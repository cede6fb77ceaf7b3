//! Nodal - Expressions compiled into a live dataflow graph
//!
//! This crate re-exports all layers of the Nodal system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: nodal_runtime    - Session, REPL, CLI
//! Layer 3: nodal_parser     - Syntax checks, graph-building parser
//!          nodal_history    - Undo/redo command log
//! Layer 2: nodal_graph      - Nodes, members, wires, update
//! Layer 1: nodal_language   - Tokens, ribbon, tokenizer, language registry
//! Layer 0: nodal_foundation - Core types (Value, Type, Error)
//! ```

pub use nodal_foundation as foundation;
pub use nodal_graph as graph;
pub use nodal_history as history;
pub use nodal_language as language;
pub use nodal_parser as parser;
pub use nodal_runtime as runtime;
