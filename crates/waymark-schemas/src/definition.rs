//! Schema assembly and read-boundary resolution.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use waymark_ast::{Document, Value};

use crate::constraint::Constraint;
use crate::error::SchemaError;

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Absence is a validation error.
    Required,
    /// Absence is fine; constraints run only on provided values.
    Optional,
}

/// Requirements for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Presence requirement.
    pub presence: Presence,
    /// Constraint chain, evaluated in full.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Read-boundary default. Applied by [`SchemaDefinition::resolve`] and
    /// nowhere else: canonical output never contains it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A required field with an empty chain.
    pub fn required() -> Self {
        Self {
            presence: Presence::Required,
            constraints: Vec::new(),
            default: None,
        }
    }

    /// An optional field with an empty chain.
    pub fn optional() -> Self {
        Self {
            presence: Presence::Optional,
            constraints: Vec::new(),
            default: None,
        }
    }

    /// Appends a constraint to the chain.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the read-boundary default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A field path paired with its spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Dotted path, e.g. `META.TYPE` or `PAYLOAD.target`.
    pub path: String,
    /// Requirements at that path.
    pub spec: FieldSpec,
}

impl FieldRule {
    /// Pairs a path with its spec.
    pub fn new(path: impl Into<String>, spec: FieldSpec) -> Self {
        Self {
            path: path.into(),
            spec,
        }
    }
}

/// A complete schema. Schemas are plain values handed to validation and
/// repair explicitly; there is no global registry and no file loading here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Schema name, stamped into validation results.
    pub name: String,
    /// Schema version, stamped into validation results.
    pub version: String,
    /// Field rules in declaration order.
    pub fields: Vec<FieldRule>,
    /// When set, assignments the schema does not name produce warnings.
    /// Unknown fields are unchecked, never invalid.
    #[serde(default)]
    pub deny_unknown: bool,
}

impl SchemaDefinition {
    /// Validates and assembles a schema: paths unique, `matches` patterns
    /// compiling, enum lists non-empty, defaults real values.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        fields: Vec<FieldRule>,
        deny_unknown: bool,
    ) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for rule in &fields {
            if !seen.insert(rule.path.clone()) {
                return Err(SchemaError::DuplicateField {
                    path: rule.path.clone(),
                });
            }
            if matches!(rule.spec.default, Some(Value::Absent)) {
                return Err(SchemaError::AbsentDefault {
                    path: rule.path.clone(),
                });
            }
            for constraint in &rule.spec.constraints {
                match constraint {
                    Constraint::Matches { pattern } => {
                        if let Err(err) = Regex::new(pattern) {
                            return Err(SchemaError::InvalidPattern {
                                path: rule.path.clone(),
                                pattern: pattern.clone(),
                                reason: err.to_string(),
                            });
                        }
                    }
                    Constraint::OneOf { allowed } if allowed.is_empty() => {
                        return Err(SchemaError::EmptyEnum {
                            path: rule.path.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(Self {
            name: name.into(),
            version: version.into(),
            fields,
            deny_unknown,
        })
    }

    /// The spec covering `path`, if any.
    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|rule| rule.path == path)
            .map(|rule| &rule.spec)
    }

    /// Reads `path` from a document through this schema. Defaults apply
    /// here and only here; the document itself is never rewritten. An
    /// explicit null is a provided value, the absent sentinel is not.
    pub fn resolve<'a>(&'a self, doc: &'a Document, path: &str) -> Resolved<'a> {
        match doc.value_at(path) {
            Some(value) if !value.is_absent() => Resolved::Provided(value),
            _ => match self.field(path).and_then(|spec| spec.default.as_ref()) {
                Some(default) => Resolved::Defaulted(default),
                None => Resolved::Absent,
            },
        }
    }
}

/// Outcome of a schema-aware read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The document carries the value.
    Provided(&'a Value),
    /// The document omits the field; the schema supplies its default.
    Defaulted(&'a Value),
    /// Omitted, and no default exists.
    Absent,
}
