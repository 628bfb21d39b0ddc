use std::fmt;

/// Dotted path addressing a node inside a document, e.g. `PAYLOAD.retry.max`
/// or `PAYLOAD.steps.[2]`. Used by validation issues and audit entries so a
/// reader can locate exactly which field a claim is about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The document root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// A path starting at a single field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Returns this path extended by a field segment.
    pub fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    /// Returns this path extended by a list index segment.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }

    /// True for the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_segments() {
        let path = NodePath::field("PAYLOAD").push_field("retry").push_index(2);
        assert_eq!(path.to_string(), "PAYLOAD.retry.[2]");
        assert_eq!(NodePath::root().to_string(), "root");
    }

    #[test]
    fn push_does_not_mutate() {
        let base = NodePath::field("META");
        let _child = base.push_field("TYPE");
        assert_eq!(base.segments(), &["META".to_string()]);
    }
}
