//! The composed canonicalization pipeline.
//!
//! Two entry points cover the two ways documents arrive: bare text with no
//! contract, and text under a schema. Both produce a [`CanonicalOutcome`]
//! whose log is stamped with the profile identifier, so any consumer can
//! tell which rules produced a given canonical text.

use serde::{Deserialize, Serialize};
use waymark_ast::Document;
use waymark_schemas::SchemaDefinition;
use waymark_syntax::{emit, parse, tokenize, Token, TokenKind, UnicodeNotice};

use crate::digest::{text_digest, ContentDigest};
use crate::errors::EngineError;
use crate::repair::{repair, RepairEntry, RepairMiss, RepairTier, ZoneReceipt};
use crate::validate::{validate, ValidationResult};

/// Profile identifier stamped on every log this pipeline produces.
pub const CANONICAL_PROFILE: &str = "waymark-canonical-v1";

/// Digest pair recorded when canonicalization changed the text's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutChange {
    /// Digest of the input text.
    pub input: ContentDigest,
    /// Digest of the canonical text.
    pub canonical: ContentDigest,
}

/// Everything a pipeline run did to the document, in one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairLog {
    /// Profile identifier, always [`CANONICAL_PROFILE`].
    pub profile: String,
    /// Source-level notes (NFC-normalized lines, dropped comments) followed
    /// by tree-level repair entries, each in order.
    pub entries: Vec<RepairEntry>,
    /// Declined repairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub misses: Vec<RepairMiss>,
    /// Zone receipts from the repair stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zone_receipts: Vec<ZoneReceipt>,
    /// Present when the canonical text differs from the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutChange>,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalOutcome {
    /// The parsed (and, under a schema, repaired) tree.
    pub document: Document,
    /// Canonical rendering of that tree.
    pub canonical_text: String,
    /// Validation result; explicitly unvalidated when no schema ran.
    pub validation: ValidationResult,
    /// The audit log.
    pub log: RepairLog,
}

/// Canonicalizes `text` with no schema in play: tokenize, parse, emit.
///
/// No repair pass runs. The log still accounts for everything that changed
/// between input and output: each NFC-normalized source line, each dropped
/// comment, and a digest pair when the overall shape changed.
pub fn canonicalize(text: &str) -> Result<CanonicalOutcome, EngineError> {
    let lexed = tokenize(text)?;
    let document = parse(&lexed.tokens)?;
    let canonical_text = emit(&document);
    let validation = ValidationResult::unvalidated(document.literal_zone_count());
    let log = RepairLog {
        profile: CANONICAL_PROFILE.to_string(),
        entries: source_entries(&lexed.notices, &lexed.tokens),
        misses: Vec::new(),
        zone_receipts: Vec::new(),
        layout: layout_change(text, &canonical_text),
    };
    Ok(CanonicalOutcome {
        document,
        canonical_text,
        validation,
        log,
    })
}

/// Canonicalizes `text` under `schema`: tokenize, parse, repair, validate,
/// emit. Validation sees the repaired tree, so a coercible value judged
/// with `apply` set is judged in its repaired form.
pub fn canonicalize_with_schema(
    text: &str,
    schema: &SchemaDefinition,
    apply: bool,
) -> Result<CanonicalOutcome, EngineError> {
    let lexed = tokenize(text)?;
    let parsed = parse(&lexed.tokens)?;
    let repaired = repair(&parsed, schema, apply);
    let validation = validate(&repaired.document, schema);
    let canonical_text = emit(&repaired.document);
    let mut entries = source_entries(&lexed.notices, &lexed.tokens);
    entries.extend(repaired.entries);
    let log = RepairLog {
        profile: CANONICAL_PROFILE.to_string(),
        entries,
        misses: repaired.misses,
        zone_receipts: repaired.receipts,
        layout: layout_change(text, &canonical_text),
    };
    Ok(CanonicalOutcome {
        document: repaired.document,
        canonical_text,
        validation,
        log,
    })
}

/// Log entries for what the lexer already did to the source: NFC-normalized
/// lines and comments the canonical form drops. Ordered by line.
fn source_entries(notices: &[UnicodeNotice], tokens: &[Token]) -> Vec<RepairEntry> {
    let mut lined: Vec<(u32, RepairEntry)> = Vec::new();
    for notice in notices {
        lined.push((
            notice.line,
            RepairEntry {
                location: format!("line {}", notice.line),
                before: format!("{:?}", notice.before),
                after: format!("{:?}", notice.after),
                tier: RepairTier::Normalization,
                semantics_changed: false,
            },
        ));
    }
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Comment) {
        let before = if token.value.is_empty() {
            "#".to_string()
        } else {
            format!("# {}", token.value)
        };
        lined.push((
            token.line,
            RepairEntry {
                location: format!("line {}", token.line),
                before,
                after: String::new(),
                tier: RepairTier::Normalization,
                semantics_changed: false,
            },
        ));
    }
    lined.sort_by_key(|(line, _)| *line);
    lined.into_iter().map(|(_, entry)| entry).collect()
}

fn layout_change(input: &str, canonical: &str) -> Option<LayoutChange> {
    if input == canonical {
        None
    } else {
        Some(LayoutChange {
            input: text_digest(input),
            canonical: text_digest(canonical),
        })
    }
}
