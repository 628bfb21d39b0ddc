use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One structural node of a document body.
///
/// Sections and blocks are both ordered containers; they differ only in
/// naming convention. A container whose name matches `[A-Z_][A-Z0-9_]*` is a
/// section, any other container is a block. The distinction is by name, not
/// by position, so a tree rebuilt from its parts classifies identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// `key::value`.
    Assignment {
        /// Assignment key.
        key: String,
        /// Assigned value.
        value: Value,
    },
    /// `NAME:` followed by indented children.
    Section {
        /// Section name (matches `[A-Z_][A-Z0-9_]*`).
        name: String,
        /// Children, in document order.
        children: Vec<Node>,
    },
    /// `key:` followed by indented children.
    Block {
        /// Block key.
        key: String,
        /// Children, in document order.
        children: Vec<Node>,
    },
}

impl Node {
    /// Constructs an assignment node.
    pub fn assignment(key: impl Into<String>, value: Value) -> Self {
        Node::Assignment {
            key: key.into(),
            value,
        }
    }

    /// Constructs a container node, classified by its name.
    pub fn container(name: impl Into<String>, children: Vec<Node>) -> Self {
        let name = name.into();
        if is_section_name(&name) {
            Node::Section { name, children }
        } else {
            Node::Block {
                key: name,
                children,
            }
        }
    }

    /// The key or name this node occupies in its parent's namespace.
    pub fn key_name(&self) -> &str {
        match self {
            Node::Assignment { key, .. } => key,
            Node::Section { name, .. } => name,
            Node::Block { key, .. } => key,
        }
    }

    /// Children of a container node; empty slice for assignments.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Assignment { .. } => &[],
            Node::Section { children, .. } => children,
            Node::Block { children, .. } => children,
        }
    }
}

/// True when `name` follows the section naming convention
/// (`[A-Z_][A-Z0-9_]*`).
pub fn is_section_name(name: &str) -> bool {
    let re = Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("invalid regex");
    re.is_match(name)
}

/// True when `key` is a valid assignment or container key
/// (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_key(key: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid regex");
    re.is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_names() {
        assert!(is_section_name("PAYLOAD"));
        assert!(is_section_name("META"));
        assert!(is_section_name("_PRIVATE_2"));
        assert!(!is_section_name("payload"));
        assert!(!is_section_name("Payload"));
        assert!(!is_section_name("2FAST"));
        assert!(!is_section_name(""));
    }

    #[test]
    fn keys() {
        assert!(is_valid_key("retry_policy"));
        assert!(is_valid_key("TYPE"));
        assert!(is_valid_key("_x9"));
        assert!(!is_valid_key("retry-policy"));
        assert!(!is_valid_key("9lives"));
        assert!(!is_valid_key("a.b"));
    }

    #[test]
    fn container_classification_by_name() {
        let section = Node::container("PAYLOAD", vec![]);
        assert!(matches!(section, Node::Section { .. }));
        let block = Node::container("retry_policy", vec![]);
        assert!(matches!(block, Node::Block { .. }));
    }
}
