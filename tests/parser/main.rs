//! Integration tests for Layer 3: Parser
//!
//! Tests for evaluation results, precedence, graph shape, and rollback on failure.

mod evaluation;
mod failures;
