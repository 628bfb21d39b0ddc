use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::validation::ModelError;
use crate::value::Value;

/// Validated document name from the `===NAME===` header
/// (pattern: `[A-Z_][A-Z0-9_]*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentName(String);

impl DocumentName {
    /// Creates a new instance without validation; callers are responsible
    /// for conformity.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Parses a validated document name from a string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelError> {
        let s = value.into();
        if !Regex::new(r"^[A-Z_][A-Z0-9_]*$")
            .expect("invalid regex")
            .is_match(&s)
        {
            return Err(ModelError::PatternMismatch {
                field: "DocumentName",
                value: s,
            });
        }
        Ok(Self(s))
    }
}

impl From<String> for DocumentName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A parsed Waymark document: optional verbatim frontmatter, header name,
/// the `META:` section's assignments, and the ordered body.
///
/// Frontmatter holds the raw bytes between the `---` delimiters and is never
/// normalized. Whitespace-only frontmatter is folded to `None` at
/// construction so an omitted-on-emit block cannot desynchronize round
/// trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Raw frontmatter between the `---` delimiters, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<String>,
    /// Document name from the header line.
    pub name: DocumentName,
    /// Assignments of the `META:` section, in document order.
    pub meta: Vec<Node>,
    /// Top-level sections, blocks, and assignments, in document order.
    pub body: Vec<Node>,
}

impl Document {
    /// Constructs a document with no frontmatter.
    pub fn new(name: DocumentName, meta: Vec<Node>, body: Vec<Node>) -> Self {
        Self {
            frontmatter: None,
            name,
            meta,
            body,
        }
    }

    /// Attaches frontmatter, folding empty or whitespace-only content to
    /// `None`.
    pub fn with_frontmatter(mut self, frontmatter: impl Into<String>) -> Self {
        let raw = frontmatter.into();
        self.frontmatter = if raw.trim().is_empty() { None } else { Some(raw) };
        self
    }

    /// Looks up the value assigned at a dotted field path, e.g. `META.TYPE`
    /// or `PAYLOAD.retry.max`. Returns `None` when the path names nothing or
    /// names a container: absence stays observable instead of decaying to
    /// [`Value::Null`]. List elements are not addressable here.
    pub fn value_at(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let rest: Vec<&str> = segments.collect();

        if first == "META" && !rest.is_empty() {
            return lookup_in(&self.meta, &rest);
        }
        let mut full = vec![first];
        full.extend(rest);
        lookup_in(&self.body, &full)
    }

    /// Counts literal zones across META and body.
    pub fn literal_zone_count(&self) -> usize {
        fn count_nodes(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Assignment { value, .. } => count_value(value),
                    Node::Section { children, .. } | Node::Block { children, .. } => {
                        count_nodes(children)
                    }
                })
                .sum()
        }
        fn count_value(value: &Value) -> usize {
            match value {
                Value::LiteralZone(_) => 1,
                Value::List { items } => items.iter().map(count_value).sum(),
                Value::Scalar(_) | Value::InlineMap { .. } | Value::Absent | Value::Null => 0,
            }
        }
        count_nodes(&self.meta) + count_nodes(&self.body)
    }
}

fn lookup_in<'a>(nodes: &'a [Node], segments: &[&str]) -> Option<&'a Value> {
    let (head, tail) = segments.split_first()?;
    for node in nodes {
        if node.key_name() != *head {
            continue;
        }
        return match node {
            Node::Assignment { value, .. } => {
                if tail.is_empty() {
                    Some(value)
                } else {
                    None
                }
            }
            Node::Section { children, .. } | Node::Block { children, .. } => {
                if tail.is_empty() {
                    None
                } else {
                    lookup_in(children, tail)
                }
            }
        };
    }
    None
}
