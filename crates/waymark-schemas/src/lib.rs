//! Schema definitions and constraint chains for Waymark validation.
//!
//! This crate provides:
//! - [`SchemaDefinition`] / [`FieldRule`] / [`FieldSpec`]: in-memory schemas,
//!   handed to the engine explicitly — there is no global registry and no
//!   file loading
//! - [`Constraint`] / [`TypeTag`]: the closed constraint vocabulary
//! - [`Resolved`]: the read-boundary view that keeps provided, defaulted,
//!   and absent values distinct
//!
//! Schemas never see literal zone content: zone constraints check the value
//! variant and its info tag only.

#![deny(missing_docs)]

/// Constraint vocabulary.
pub mod constraint;
/// Schema assembly and read-boundary resolution.
pub mod definition;
/// Construction errors.
pub mod error;

pub use constraint::{Constraint, TypeTag};
pub use definition::{FieldRule, FieldSpec, Presence, Resolved, SchemaDefinition};
pub use error::SchemaError;
