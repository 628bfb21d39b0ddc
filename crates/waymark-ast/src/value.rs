use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ModelError;

/// Atomic scalar payloads.
///
/// Numbers keep the literal text they were written with: rewriting `1.50`
/// to `1.5` would discard precision the author chose to state, so the
/// canonical form of a number is its own lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Scalar {
    /// UTF-8 text (NFC in canonical documents).
    Str {
        /// The text itself.
        v: String,
    },
    /// Numeric literal, carried as validated text.
    Num {
        /// The number lexeme (e.g. `-3`, `1.50`, `2e8`).
        v: String,
    },
    /// Boolean.
    Bool {
        /// The truth value.
        v: bool,
    },
}

impl Scalar {
    /// Constructs a string scalar.
    pub fn str(value: impl Into<String>) -> Self {
        Scalar::Str { v: value.into() }
    }

    /// Constructs a validated number scalar from its lexeme.
    pub fn number(lexeme: impl Into<String>) -> Result<Self, ModelError> {
        let lexeme = lexeme.into();
        if !is_number_lexeme(&lexeme) {
            return Err(ModelError::PatternMismatch {
                field: "number",
                value: lexeme,
            });
        }
        Ok(Scalar::Num { v: lexeme })
    }

    /// Constructs a boolean scalar.
    pub fn bool(value: bool) -> Self {
        Scalar::Bool { v: value }
    }
}

/// Returns true when `value` is a valid Waymark number lexeme.
pub fn is_number_lexeme(value: &str) -> bool {
    let re = Regex::new(r"^-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("invalid regex");
    re.is_match(value)
}

/// One `key=value` entry of an inline map. Values are atomic by type:
/// nesting inside an inline map is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Entry key.
    pub key: String,
    /// Atomic entry value.
    pub value: Scalar,
}

/// A backtick-fenced literal zone: opaque raw text that no normalization,
/// validation, or repair may ever rewrite.
///
/// `content` excludes the newline that separates the last content line from
/// the closing fence; a trailing `"\n"` therefore denotes a trailing empty
/// line. The marker must be longer than every line-leading backtick run in
/// the content, otherwise the rendered zone could not be read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralZone {
    /// Raw zone content, byte-exact (tabs and unnormalized Unicode included).
    pub content: String,
    /// Info tag from the opening fence line (e.g. `python`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_tag: Option<String>,
    /// The fence marker, e.g. `` ``` `` or ```` ```` ````.
    pub fence_marker: String,
}

impl LiteralZone {
    /// Constructs a validated literal zone.
    pub fn new(
        content: impl Into<String>,
        info_tag: Option<String>,
        fence_marker: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let content = content.into();
        let fence_marker = fence_marker.into();
        if fence_marker.len() < 3 || fence_marker.chars().any(|c| c != '`') {
            return Err(ModelError::PatternMismatch {
                field: "fence_marker",
                value: fence_marker,
            });
        }
        let run = max_leading_backtick_run(&content);
        if run >= fence_marker.len() {
            return Err(ModelError::FenceUnwrappable {
                marker_len: fence_marker.len(),
                run_len: run,
            });
        }
        Ok(LiteralZone {
            content,
            info_tag,
            fence_marker,
        })
    }

    /// Constructs a zone whose marker is computed to wrap `content`: three
    /// backticks, or one more than the longest line-leading run inside.
    pub fn wrapping(content: impl Into<String>, info_tag: Option<String>) -> Self {
        let content = content.into();
        let len = max_leading_backtick_run(&content).max(2) + 1;
        let fence_marker = "`".repeat(len);
        LiteralZone {
            content,
            info_tag,
            fence_marker,
        }
    }
}

/// Longest backtick run that opens a line of `content` (after any leading
/// spaces). Runs elsewhere in a line can never be mistaken for a fence.
pub fn max_leading_backtick_run(content: &str) -> usize {
    content
        .split('\n')
        .map(|line| {
            let stripped = line.trim_start_matches(' ');
            stripped.chars().take_while(|&c| c == '`').count()
        })
        .max()
        .unwrap_or(0)
}

/// The value of an assignment.
///
/// `Absent` and `Null` are distinct on purpose: `Absent` means the field was
/// never provided (it is produced at the read boundary, never by the parser,
/// and never emitted), while `Null` means the field was provided empty
/// (`KEY::` with nothing after the operator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
    /// A single scalar.
    Scalar(Scalar),
    /// An ordered sequence of values, written inline as `[a, b]`.
    List {
        /// The elements, in document order.
        items: Vec<Value>,
    },
    /// An ordered atomic mapping, written inline as `{k=v, k2=v2}`.
    InlineMap {
        /// The entries, in document order.
        entries: Vec<MapEntry>,
    },
    /// A backtick-fenced literal zone.
    LiteralZone(LiteralZone),
    /// Field never provided. Read-boundary sentinel only.
    Absent,
    /// Field provided and explicitly empty.
    Null,
}

impl Value {
    /// Shorthand for a string scalar value.
    pub fn str(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::str(value))
    }

    /// Shorthand for a boolean scalar value.
    pub fn bool(value: bool) -> Self {
        Value::Scalar(Scalar::bool(value))
    }

    /// Shorthand for a validated number scalar value.
    pub fn number(lexeme: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Value::Scalar(Scalar::number(lexeme)?))
    }

    /// True for [`Value::LiteralZone`].
    pub fn is_literal_zone(&self) -> bool {
        matches!(self, Value::LiteralZone(_))
    }

    /// True for [`Value::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<LiteralZone> for Value {
    fn from(zone: LiteralZone) -> Self {
        Value::LiteralZone(zone)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_lexemes() {
        assert!(is_number_lexeme("0"));
        assert!(is_number_lexeme("-42"));
        assert!(is_number_lexeme("1.50"));
        assert!(is_number_lexeme("2e8"));
        assert!(is_number_lexeme("-3.1e-2"));
        assert!(!is_number_lexeme("1."));
        assert!(!is_number_lexeme(".5"));
        assert!(!is_number_lexeme("0x10"));
        assert!(!is_number_lexeme("1 0"));
    }

    #[test]
    fn number_scalar_keeps_lexeme() {
        let n = Scalar::number("1.50").unwrap();
        assert_eq!(n, Scalar::Num { v: "1.50".into() });
        assert!(Scalar::number("nope").is_err());
    }

    #[test]
    fn zone_rejects_short_marker() {
        assert!(LiteralZone::new("x", None, "``").is_err());
        assert!(LiteralZone::new("x", None, "``x").is_err());
        assert!(LiteralZone::new("x", None, "```").is_ok());
    }

    #[test]
    fn zone_rejects_unwrappable_content() {
        let err = LiteralZone::new("```\n", None, "```").unwrap_err();
        assert_eq!(
            err,
            ModelError::FenceUnwrappable {
                marker_len: 3,
                run_len: 3
            }
        );
        assert!(LiteralZone::new("```\n", None, "````").is_ok());
    }

    #[test]
    fn wrapping_computes_marker() {
        assert_eq!(LiteralZone::wrapping("hello", None).fence_marker, "```");
        assert_eq!(
            LiteralZone::wrapping("``` inner", None).fence_marker,
            "````"
        );
        assert_eq!(
            LiteralZone::wrapping("  ````` deep", None).fence_marker,
            "``````"
        );
    }

    #[test]
    fn leading_run_ignores_mid_line_backticks() {
        assert_eq!(max_leading_backtick_run("a ``` b"), 0);
        assert_eq!(max_leading_backtick_run("  ```b"), 3);
        assert_eq!(max_leading_backtick_run("one\n````\ntwo"), 4);
    }

    #[test]
    fn absent_and_null_are_distinct() {
        assert_ne!(Value::Absent, Value::Null);
        assert!(Value::Absent.is_absent());
        assert!(!Value::Null.is_absent());
    }
}
