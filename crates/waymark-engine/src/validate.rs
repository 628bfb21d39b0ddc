//! Schema validation over a parsed document.
//!
//! Validation never rewrites anything and never stops early: every field
//! rule is checked, every failing link of every constraint chain is
//! collected, and the caller decides what a failing document means. Literal
//! zone content is outside the statement by construction; a result only
//! ever vouches for structure and scalars, and says so via
//! [`ValidationResult::literal_zones_validated`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use waymark_ast::{Document, Node, NodePath, Scalar, Value};
use waymark_schemas::{Constraint, Presence, SchemaDefinition, TypeTag};

/// Stable machine-readable code carried by every issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A `Required` field is not provided by the document.
    MissingRequiredField,
    /// The value's shape does not fit the constraint.
    TypeMismatch,
    /// A string is not one of the allowed enum variants.
    EnumMismatch,
    /// A string does not match the schema pattern.
    PatternMismatch,
    /// The constraint demands a literal zone, the value is something else.
    ExpectedLiteralZone,
    /// A literal zone carries the wrong info tag, or none.
    ZoneTagMismatch,
    /// The document provides a field the schema does not declare.
    UnknownField,
}

/// One finding at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path of the field the finding is about.
    pub path: String,
    /// Stable code for machine handling.
    pub code: IssueCode,
    /// What was found and what would fix it.
    pub message: String,
}

/// Whether a schema was applied, and which one.
///
/// The pipeline emits `Unvalidated` explicitly when run without a schema;
/// consumers never have to guess from an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    /// A schema was applied.
    Validated {
        /// Schema name.
        schema: String,
        /// Schema version.
        version: String,
    },
    /// No schema was supplied; nothing was checked.
    Unvalidated,
}

/// Collected outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no errors were collected. Warnings do not affect it.
    pub valid: bool,
    /// Failures that make the document invalid under the schema.
    pub errors: Vec<ValidationIssue>,
    /// Findings worth reporting that do not invalidate the document.
    pub warnings: Vec<ValidationIssue>,
    /// Which schema, if any, this result speaks for.
    pub validation_status: ValidationStatus,
    /// How many literal zones the document carries.
    pub literal_zone_count: usize,
    /// Always `false`: zone content is never inspected, so no result may
    /// claim otherwise.
    pub literal_zones_validated: bool,
}

impl ValidationResult {
    /// Result for a pipeline run without a schema: trivially valid,
    /// explicitly unvalidated.
    pub fn unvalidated(literal_zone_count: usize) -> Self {
        ValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            validation_status: ValidationStatus::Unvalidated,
            literal_zone_count,
            literal_zones_validated: false,
        }
    }
}

/// Validates `doc` against `schema`, collecting every finding in one pass.
///
/// Presence is judged on what the document provides: `Null` is provided
/// (the author wrote `key::` deliberately) and still runs the constraint
/// chain; a schema default never satisfies `Required` — defaults exist for
/// readers, not for documents.
pub fn validate(doc: &Document, schema: &SchemaDefinition) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for rule in &schema.fields {
        match doc.value_at(&rule.path) {
            Some(value) if !value.is_absent() => {
                check_chain(&rule.path, value, &rule.spec.constraints, &mut errors);
            }
            _ => {
                if rule.spec.presence == Presence::Required {
                    errors.push(ValidationIssue {
                        path: rule.path.clone(),
                        code: IssueCode::MissingRequiredField,
                        message: "required field is not provided; add it explicitly \
                                  (a schema default never satisfies presence)"
                            .to_string(),
                    });
                }
            }
        }
    }

    if schema.deny_unknown {
        let mut provided = Vec::new();
        collect_assignment_paths(&doc.meta, &NodePath::field("META"), &mut provided);
        collect_assignment_paths(&doc.body, &NodePath::root(), &mut provided);
        for path in provided {
            if schema.field(&path).is_none() {
                warnings.push(ValidationIssue {
                    path,
                    code: IssueCode::UnknownField,
                    message: format!(
                        "field is not declared by schema {:?}; remove it or extend the schema",
                        schema.name
                    ),
                });
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
        validation_status: ValidationStatus::Validated {
            schema: schema.name.clone(),
            version: schema.version.clone(),
        },
        literal_zone_count: doc.literal_zone_count(),
        literal_zones_validated: false,
    }
}

/// Evaluates the full chain; every failing link lands in `errors`.
fn check_chain(
    path: &str,
    value: &Value,
    constraints: &[Constraint],
    errors: &mut Vec<ValidationIssue>,
) {
    let mut push = |code: IssueCode, message: String| {
        errors.push(ValidationIssue {
            path: path.to_string(),
            code,
            message,
        });
    };

    for constraint in constraints {
        match constraint {
            Constraint::OneOf { allowed } => match value {
                Value::Scalar(Scalar::Str { v }) => {
                    if !allowed.iter().any(|a| a == v) {
                        push(
                            IssueCode::EnumMismatch,
                            format!(
                                "{:?} is not one of [{}]; use one of the listed variants verbatim",
                                v,
                                allowed.join(", ")
                            ),
                        );
                    }
                }
                other => push(
                    IssueCode::TypeMismatch,
                    format!(
                        "enum constraint needs a string scalar, found {}; write the value as a string",
                        found_shape(other)
                    ),
                ),
            },
            Constraint::Matches { pattern } => match value {
                Value::Scalar(Scalar::Str { v }) => match Regex::new(pattern) {
                    Ok(re) => {
                        if !re.is_match(v) {
                            push(
                                IssueCode::PatternMismatch,
                                format!(
                                    "{:?} does not match {:?}; adjust the value to fit the pattern",
                                    v, pattern
                                ),
                            );
                        }
                    }
                    // Reachable only for schemas deserialized around the
                    // validated constructor.
                    Err(_) => push(
                        IssueCode::PatternMismatch,
                        format!(
                            "pattern {:?} does not compile and can match nothing; rebuild the schema via SchemaDefinition::new",
                            pattern
                        ),
                    ),
                },
                other => push(
                    IssueCode::TypeMismatch,
                    format!(
                        "pattern constraint needs a string scalar, found {}; write the value as a string",
                        found_shape(other)
                    ),
                ),
            },
            Constraint::TypeTag { tag } => {
                if !shape_matches(*tag, value) {
                    push(
                        IssueCode::TypeMismatch,
                        format!(
                            "expected {}, found {}; rewrite the value as {}",
                            tag_name(*tag),
                            found_shape(value),
                            tag_name(*tag)
                        ),
                    );
                }
            }
            Constraint::LiteralZone => {
                if !value.is_literal_zone() {
                    push(
                        IssueCode::ExpectedLiteralZone,
                        format!(
                            "expected a backtick-fenced literal zone, found {}; fence the value",
                            found_shape(value)
                        ),
                    );
                }
            }
            Constraint::ZoneTag { tag } => match value {
                Value::LiteralZone(zone) => match &zone.info_tag {
                    Some(found) if found == tag => {}
                    Some(found) => push(
                        IssueCode::ZoneTagMismatch,
                        format!(
                            "zone is tagged {:?}, schema expects {:?}; retag the opening fence",
                            found, tag
                        ),
                    ),
                    None => push(
                        IssueCode::ZoneTagMismatch,
                        format!(
                            "zone carries no info tag, schema expects {:?}; tag the opening fence",
                            tag
                        ),
                    ),
                },
                other => push(
                    IssueCode::ExpectedLiteralZone,
                    format!(
                        "expected a literal zone tagged {:?}, found {}; fence the value",
                        tag,
                        found_shape(other)
                    ),
                ),
            },
        }
    }
}

fn shape_matches(tag: TypeTag, value: &Value) -> bool {
    match tag {
        TypeTag::Str => matches!(value, Value::Scalar(Scalar::Str { .. })),
        TypeTag::Number => matches!(value, Value::Scalar(Scalar::Num { .. })),
        TypeTag::Bool => matches!(value, Value::Scalar(Scalar::Bool { .. })),
        TypeTag::List => matches!(value, Value::List { .. }),
        TypeTag::Map => matches!(value, Value::InlineMap { .. }),
    }
}

fn tag_name(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Str => "string",
        TypeTag::Number => "number",
        TypeTag::Bool => "bool",
        TypeTag::List => "list",
        TypeTag::Map => "inline map",
    }
}

/// Shape name of a value, for messages.
pub(crate) fn found_shape(value: &Value) -> &'static str {
    match value {
        Value::Scalar(Scalar::Str { .. }) => "string",
        Value::Scalar(Scalar::Num { .. }) => "number",
        Value::Scalar(Scalar::Bool { .. }) => "bool",
        Value::List { .. } => "list",
        Value::InlineMap { .. } => "inline map",
        Value::LiteralZone(_) => "literal zone",
        Value::Null => "null",
        Value::Absent => "absent",
    }
}

fn collect_assignment_paths(nodes: &[Node], parent: &NodePath, out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Assignment { key, .. } => out.push(parent.push_field(key).to_string()),
            Node::Section { name, children } => {
                collect_assignment_paths(children, &parent.push_field(name), out)
            }
            Node::Block { key, children } => {
                collect_assignment_paths(children, &parent.push_field(key), out)
            }
        }
    }
}
