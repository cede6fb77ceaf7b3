//! Integration tests for Layer 2: Graph
//!
//! Tests for the graph container: factories, wiring rules, destruction,
//! snapshots, and value propagation.

mod update;
