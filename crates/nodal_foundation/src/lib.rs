//! Core values, types, and errors for Nodal.
//!
//! This crate provides:
//! - [`Value`] - The value carried by every member of the dataflow graph
//! - [`Type`] - Type descriptors used for signature matching
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, SyntaxError};
pub use types::Type;
pub use value::Value;

/// Result type alias using Nodal's error type.
pub type Result<T> = std::result::Result<T, Error>;
