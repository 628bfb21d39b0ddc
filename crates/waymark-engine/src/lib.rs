//! Validation, repair, and canonicalization pipeline for Waymark documents.
//!
//! This crate composes the syntax layer into the operations callers actually
//! run: canonicalize a document, optionally under a schema, and get back the
//! canonical text, the tree, a validation result, and an audit log that
//! accounts for every change. Literal zone content is never rewritten by any
//! stage; zone receipts in the log prove it.
//!
//! # Quick start
//!
//! ```
//! let text = "===TASK===\nMETA:\n  TYPE::REQUEST\n  VERSION::\"1\"\nPAYLOAD:\n  retries::3\n===END===\n";
//! let outcome = waymark_engine::canonicalize(text)?;
//! assert_eq!(outcome.canonical_text, text);
//! assert!(outcome.log.entries.is_empty());
//! # Ok::<(), waymark_engine::EngineError>(())
//! ```
//!
#![deny(missing_docs)]

/// Derived audit facts (tree diffing, value rendering).
mod audit;
/// Content digests with domain separation.
pub mod digest;
/// Fatal pipeline errors.
pub mod errors;
/// Pipeline composition and the audit log.
pub mod pipeline;
/// The two-tier repair engine.
pub mod repair;
/// Schema validation.
pub mod validate;

pub use digest::{text_digest, zone_digest, ContentDigest, DigestAlg};
pub use errors::EngineError;
pub use pipeline::{
    canonicalize, canonicalize_with_schema, CanonicalOutcome, LayoutChange, RepairLog,
    CANONICAL_PROFILE,
};
pub use repair::{normalize, repair, RepairEntry, RepairMiss, RepairOutcome, RepairTier, ZoneReceipt};
pub use validate::{validate, IssueCode, ValidationIssue, ValidationResult, ValidationStatus};
