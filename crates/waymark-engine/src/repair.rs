//! The repair engine: a pure tree-to-tree transform with a derived audit
//! trail.
//!
//! Two tiers do the work. NORMALIZATION always runs and is meaning
//! preserving: Unicode NFC over string scalar contents and zone info tags,
//! the only positions where non-NFC bytes can occur (keys are ASCII by
//! grammar, and parsed trees arrive already normalized). REPAIR runs only
//! when `apply` is true and is bounded by the schema: enum case folds and
//! the two string coercions (bool, number). Nothing here ever guesses — an
//! ambiguous candidate is a recorded miss, a missing required field stays
//! missing, and literal zone content is never touched; every zone instead
//! yields a digest receipt proving it crossed the stage unchanged.
//!
//! The audit log is a derived fact: the rebuilt tree is diffed against the
//! input and every diff site must match a change the transform planned, or
//! the pass panics on an internal defect.

use serde::{Deserialize, Serialize};
use unicode_normalization::{is_nfc, UnicodeNormalization};
use waymark_ast::{
    is_number_lexeme, Document, LiteralZone, MapEntry, Node, NodePath, Scalar, Value,
};
use waymark_schemas::{Constraint, FieldSpec, SchemaDefinition, TypeTag};

use crate::audit::{diff_documents, DiffSite};
use crate::digest::{zone_digest, ContentDigest};

/// Tier of a performed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairTier {
    /// Always applied, meaning preserving.
    Normalization,
    /// Schema-bounded coercion, applied only on request.
    Repair,
}

/// One performed change, derived from the tree diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairEntry {
    /// Dotted path of the changed leaf, or `line N` for source-level notes.
    pub location: String,
    /// Rendered value before the change.
    pub before: String,
    /// Rendered value after.
    pub after: String,
    /// Which tier performed it.
    pub tier: RepairTier,
    /// True when the change is more than representational (a coercion that
    /// altered the value's type or meaning).
    pub semantics_changed: bool,
}

/// A repair the engine declined to make. The original value is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairMiss {
    /// Dotted path of the field.
    pub location: String,
    /// Why the repair was declined, and what the author can do instead.
    pub reason: String,
    /// Tier that declined.
    pub tier: RepairTier,
}

/// Proof that a literal zone crossed the repair stage byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneReceipt {
    /// Dotted path of the zone.
    pub location: String,
    /// Digest of the content before the pass.
    pub digest_before: ContentDigest,
    /// Digest after. Always equal to `digest_before`; inequality is an
    /// internal assertion failure, never a reportable condition.
    pub digest_after: ContentDigest,
}

/// Result of one repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// The rebuilt tree. The input document is never mutated.
    pub document: Document,
    /// Performed changes, in document order.
    pub entries: Vec<RepairEntry>,
    /// Declined repairs.
    pub misses: Vec<RepairMiss>,
    /// One receipt per literal zone, in document order.
    pub receipts: Vec<ZoneReceipt>,
}

/// Runs normalization and, when `apply` is true, schema-bounded repair.
pub fn repair(doc: &Document, schema: &SchemaDefinition, apply: bool) -> RepairOutcome {
    repair_pass(doc, Some(schema), apply)
}

/// Runs the normalization tier alone, with no schema in play.
pub fn normalize(doc: &Document) -> RepairOutcome {
    repair_pass(doc, None, false)
}

/// What the transform intends to change; cross-checked against the diff.
struct PlannedChange {
    location: String,
    tier: RepairTier,
    semantics_changed: bool,
}

struct RepairPass<'a> {
    schema: Option<&'a SchemaDefinition>,
    apply: bool,
    plans: Vec<PlannedChange>,
    misses: Vec<RepairMiss>,
}

fn repair_pass(doc: &Document, schema: Option<&SchemaDefinition>, apply: bool) -> RepairOutcome {
    let mut pass = RepairPass {
        schema,
        apply,
        plans: Vec::new(),
        misses: Vec::new(),
    };
    let meta = pass.rebuild_nodes(&doc.meta, &NodePath::field("META"));
    let body = pass.rebuild_nodes(&doc.body, &NodePath::root());
    let mut repaired = Document::new(doc.name.clone(), meta, body);
    repaired.frontmatter = doc.frontmatter.clone();

    let sites = diff_documents(doc, &repaired);
    let entries = reconcile(pass.plans, sites);
    let receipts = zone_receipts(doc, &repaired);

    RepairOutcome {
        document: repaired,
        entries,
        misses: pass.misses,
        receipts,
    }
}

impl RepairPass<'_> {
    fn rebuild_nodes(&mut self, nodes: &[Node], parent: &NodePath) -> Vec<Node> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Assignment { key, value } => {
                    let path = parent.push_field(key);
                    let spec = self
                        .schema
                        .and_then(|schema| schema.field(&path.to_string()));
                    Node::Assignment {
                        key: key.clone(),
                        value: self.rebuild_assignment_value(value, &path, spec),
                    }
                }
                Node::Section { name, children } => Node::Section {
                    name: name.clone(),
                    children: self.rebuild_nodes(children, &parent.push_field(name)),
                },
                Node::Block { key, children } => Node::Block {
                    key: key.clone(),
                    children: self.rebuild_nodes(children, &parent.push_field(key)),
                },
            })
            .collect()
    }

    /// Assignment values are the only coercion site; composite innards get
    /// normalization only.
    fn rebuild_assignment_value(
        &mut self,
        value: &Value,
        path: &NodePath,
        spec: Option<&FieldSpec>,
    ) -> Value {
        match value {
            Value::List { .. } | Value::InlineMap { .. } => self.rebuild_item(value, path),
            leaf => {
                let normalized = normalize_leaf(leaf);
                let (rebuilt, coercion) = if self.apply {
                    self.coerce(normalized, path, spec)
                } else {
                    (normalized, None)
                };
                if rebuilt != *value {
                    let (tier, semantics_changed) = match coercion {
                        Some(changed) => (RepairTier::Repair, changed),
                        None => (RepairTier::Normalization, false),
                    };
                    self.plans.push(PlannedChange {
                        location: path.to_string(),
                        tier,
                        semantics_changed,
                    });
                }
                rebuilt
            }
        }
    }

    fn rebuild_item(&mut self, item: &Value, path: &NodePath) -> Value {
        match item {
            Value::List { items } => Value::List {
                items: items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.rebuild_item(item, &path.push_index(i)))
                    .collect(),
            },
            Value::InlineMap { entries } => Value::InlineMap {
                entries: entries
                    .iter()
                    .map(|entry| {
                        let value = normalize_scalar(&entry.value);
                        if value != entry.value {
                            self.plans.push(PlannedChange {
                                location: path.push_field(&entry.key).to_string(),
                                tier: RepairTier::Normalization,
                                semantics_changed: false,
                            });
                        }
                        MapEntry {
                            key: entry.key.clone(),
                            value,
                        }
                    })
                    .collect(),
            },
            leaf => {
                let normalized = normalize_leaf(leaf);
                if normalized != *leaf {
                    self.plans.push(PlannedChange {
                        location: path.to_string(),
                        tier: RepairTier::Normalization,
                        semantics_changed: false,
                    });
                }
                normalized
            }
        }
    }

    /// Attempts one schema-bounded coercion of a string scalar. Returns the
    /// (possibly rewritten) value and, when a coercion was performed,
    /// whether it changed semantics.
    fn coerce(
        &mut self,
        value: Value,
        path: &NodePath,
        spec: Option<&FieldSpec>,
    ) -> (Value, Option<bool>) {
        let Some(spec) = spec else {
            return (value, None);
        };
        let text = match &value {
            Value::Scalar(Scalar::Str { v }) => v.clone(),
            _ => return (value, None),
        };

        for constraint in &spec.constraints {
            match constraint {
                Constraint::OneOf { allowed } => {
                    if allowed.iter().any(|a| *a == text) {
                        return (value, None);
                    }
                    let folded = text.to_lowercase();
                    let candidates: Vec<&String> = allowed
                        .iter()
                        .filter(|a| a.to_lowercase() == folded)
                        .collect();
                    match candidates.len() {
                        // A case fold to the single matching variant keeps
                        // the author's meaning.
                        1 => return (Value::str(candidates[0].clone()), Some(false)),
                        0 => {}
                        n => {
                            self.misses.push(RepairMiss {
                                location: path.to_string(),
                                reason: format!(
                                    "{:?} case-insensitively matches {} allowed variants; pick one explicitly",
                                    text, n
                                ),
                                tier: RepairTier::Repair,
                            });
                            return (value, None);
                        }
                    }
                }
                Constraint::TypeTag { tag: TypeTag::Bool } => {
                    if text.eq_ignore_ascii_case("true") {
                        return (Value::bool(true), Some(true));
                    }
                    if text.eq_ignore_ascii_case("false") {
                        return (Value::bool(false), Some(true));
                    }
                    self.misses.push(RepairMiss {
                        location: path.to_string(),
                        reason: format!("cannot read {:?} as bool; write true or false", text),
                        tier: RepairTier::Repair,
                    });
                    return (value, None);
                }
                Constraint::TypeTag {
                    tag: TypeTag::Number,
                } => {
                    if is_number_lexeme(&text) {
                        return (Value::Scalar(Scalar::Num { v: text }), Some(true));
                    }
                    self.misses.push(RepairMiss {
                        location: path.to_string(),
                        reason: format!(
                            "cannot read {:?} as a number; write a bare lexeme like -3 or 1.50e3",
                            text
                        ),
                        tier: RepairTier::Repair,
                    });
                    return (value, None);
                }
                _ => {}
            }
        }
        (value, None)
    }
}

fn nfc(text: &str) -> String {
    if is_nfc(text) {
        text.to_string()
    } else {
        text.nfc().collect()
    }
}

fn normalize_leaf(value: &Value) -> Value {
    match value {
        Value::Scalar(Scalar::Str { v }) => Value::Scalar(Scalar::Str { v: nfc(v) }),
        Value::LiteralZone(zone) => Value::LiteralZone(LiteralZone {
            content: zone.content.clone(),
            info_tag: zone.info_tag.as_deref().map(nfc),
            fence_marker: zone.fence_marker.clone(),
        }),
        other => other.clone(),
    }
}

fn normalize_scalar(scalar: &Scalar) -> Scalar {
    match scalar {
        Scalar::Str { v } => Scalar::Str { v: nfc(v) },
        other => other.clone(),
    }
}

fn reconcile(plans: Vec<PlannedChange>, sites: Vec<DiffSite>) -> Vec<RepairEntry> {
    assert_eq!(
        plans.len(),
        sites.len(),
        "internal defect: {} planned changes but {} observed diffs",
        plans.len(),
        sites.len()
    );
    plans
        .into_iter()
        .zip(sites)
        .map(|(plan, site)| {
            assert_eq!(
                plan.location, site.location,
                "internal defect: planned change and observed diff disagree on location"
            );
            RepairEntry {
                location: site.location,
                before: site.before,
                after: site.after,
                tier: plan.tier,
                semantics_changed: plan.semantics_changed,
            }
        })
        .collect()
}

fn zone_receipts(old: &Document, new: &Document) -> Vec<ZoneReceipt> {
    let mut old_zones = Vec::new();
    collect_zones(&old.meta, &NodePath::field("META"), &mut old_zones);
    collect_zones(&old.body, &NodePath::root(), &mut old_zones);
    let mut new_zones = Vec::new();
    collect_zones(&new.meta, &NodePath::field("META"), &mut new_zones);
    collect_zones(&new.body, &NodePath::root(), &mut new_zones);

    assert_eq!(
        old_zones.len(),
        new_zones.len(),
        "internal defect: repair changed the number of literal zones"
    );
    old_zones
        .into_iter()
        .zip(new_zones)
        .map(|((old_path, old_zone), (new_path, new_zone))| {
            assert_eq!(
                old_path, new_path,
                "internal defect: repair moved a literal zone"
            );
            let receipt = ZoneReceipt {
                location: old_path,
                digest_before: zone_digest(&old_zone.content),
                digest_after: zone_digest(&new_zone.content),
            };
            assert!(
                receipt.digest_before == receipt.digest_after,
                "internal defect: literal zone at {} was rewritten during repair",
                receipt.location
            );
            receipt
        })
        .collect()
}

fn collect_zones<'a>(
    nodes: &'a [Node],
    parent: &NodePath,
    out: &mut Vec<(String, &'a LiteralZone)>,
) {
    for node in nodes {
        match node {
            Node::Assignment { key, value } => {
                collect_zone_values(value, &parent.push_field(key), out)
            }
            Node::Section { name, children } => {
                collect_zones(children, &parent.push_field(name), out)
            }
            Node::Block { key, children } => collect_zones(children, &parent.push_field(key), out),
        }
    }
}

fn collect_zone_values<'a>(
    value: &'a Value,
    path: &NodePath,
    out: &mut Vec<(String, &'a LiteralZone)>,
) {
    match value {
        Value::LiteralZone(zone) => out.push((path.to_string(), zone)),
        Value::List { items } => {
            for (i, item) in items.iter().enumerate() {
                collect_zone_values(item, &path.push_index(i), out);
            }
        }
        _ => {}
    }
}
