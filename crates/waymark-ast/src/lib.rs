//! Document model for the Waymark structured-document format.
//!
//! This crate provides:
//! - The closed [`Node`] and [`Value`] sum types every other Waymark crate
//!   matches on exhaustively
//! - [`Document`]: the immutable envelope (frontmatter, name, META, body)
//! - [`NodePath`]: dotted paths used by validation issues and audit entries
//! - [`DocumentName`]: the validated `===NAME===` identifier
//!
//! Documents are treated as frozen once built: transformations (repair,
//! normalization) produce new trees rather than mutating in place.

#![deny(missing_docs)]

/// Document envelope and field lookup.
pub mod document;
/// Structural node types.
pub mod node;
/// Dotted node paths.
pub mod path;
/// Value sum type, scalars, and literal zones.
pub mod value;
/// Validation errors for model constructors.
pub mod validation;

pub use document::{Document, DocumentName};
pub use node::{is_section_name, is_valid_key, Node};
pub use path::NodePath;
pub use validation::ModelError;
pub use value::{is_number_lexeme, max_leading_backtick_run, LiteralZone, MapEntry, Scalar, Value};
