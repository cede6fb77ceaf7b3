//! Tokens, tokenizer, and signature registry for Nodal.
//!
//! This crate provides:
//! - [`TokenRibbon`] - Token sequence with a transactional cursor
//! - [`Tokenizer`] - Regex-rule driven tokenization
//! - [`Language`] - Operator and function catalog with precedence

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod registry;
pub mod ribbon;
pub mod signature;
pub mod stdlib;
pub mod token;
pub mod tokenizer;

pub use nodal_foundation::{Error, ErrorKind, Result, Type, Value};
pub use registry::{Callable, Language, TokenRule};
pub use ribbon::TokenRibbon;
pub use signature::{Arity, Function, NativeBody, Operator, Param, Signature};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
