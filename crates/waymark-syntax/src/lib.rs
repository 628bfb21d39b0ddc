//! Tokenizer, parser, and canonical emitter for the Waymark format.
//!
//! This crate provides:
//! - [`tokenize`]: single-pass, zone-aware lexing of lenient input
//! - [`parse`]: recursive-descent construction of a [`waymark_ast::Document`]
//! - [`emit`]: the single canonical rendering of a document
//! - [`LexError`] / [`ParseError`]: fatal errors carrying stable codes
//!
//! Literal zones and frontmatter pass through every stage byte-for-byte;
//! everything else is normalized. The passes compose as
//! tokenize → parse → emit; the engine crate wraps them with repair,
//! validation, and logging.

#![deny(missing_docs)]

/// Canonical rendering.
pub mod emitter;
/// Stable error codes and the two fatal error families.
pub mod errors;
/// Zone-aware tokenization.
pub mod lexer;
/// Recursive-descent parsing.
pub mod parser;
/// Token model.
pub mod token;

pub use emitter::emit;
pub use errors::{ErrorCode, LexError, ParseError};
pub use lexer::{tokenize, FenceSpan, LexOutput, UnicodeNotice};
pub use parser::parse;
pub use token::{Token, TokenKind};
