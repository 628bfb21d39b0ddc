//! Constraint vocabulary for field specs.

use serde::{Deserialize, Serialize};

/// Coarse value shape named by a type constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// String scalar.
    Str,
    /// Numeric scalar.
    Number,
    /// Boolean scalar.
    Bool,
    /// Single-line list.
    List,
    /// Single-line inline map.
    Map,
}

/// One check in a field's constraint chain. Chains are evaluated in full;
/// every failing link is reported.
///
/// Zone content is permanently opaque: the two zone constraints check the
/// value variant and its info tag, never the bytes between the fences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "c", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be a string scalar equal to one of the listed variants.
    OneOf {
        /// Accepted values, compared exactly.
        allowed: Vec<String>,
    },
    /// String scalar must match the pattern.
    Matches {
        /// Regex source, validated at schema construction.
        pattern: String,
    },
    /// Value must carry the given shape.
    TypeTag {
        /// Expected shape.
        tag: TypeTag,
    },
    /// Value must be a literal zone.
    LiteralZone,
    /// Value must be a literal zone whose info tag equals `tag`.
    ZoneTag {
        /// Expected info tag.
        tag: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_serialization_shapes() {
        let one_of = Constraint::OneOf {
            allowed: vec!["REQUEST".to_string(), "REPLY".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&one_of).unwrap(),
            r#"{"c":"one_of","allowed":["REQUEST","REPLY"]}"#
        );
        let tag = Constraint::TypeTag { tag: TypeTag::Number };
        assert_eq!(
            serde_json::to_string(&tag).unwrap(),
            r#"{"c":"type_tag","tag":"number"}"#
        );
        let zone = Constraint::ZoneTag {
            tag: "python".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&zone).unwrap(),
            r#"{"c":"zone_tag","tag":"python"}"#
        );
        assert_eq!(
            serde_json::to_string(&Constraint::LiteralZone).unwrap(),
            r#"{"c":"literal_zone"}"#
        );
    }
}
