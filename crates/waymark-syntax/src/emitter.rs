use regex::Regex;
use waymark_ast::{is_number_lexeme, Document, Node, Scalar, Value};

/// Renders a document in canonical form. Total: every tree has exactly one
/// rendering, and there is no error path.
///
/// Layout rules: LF endings, 2-space indentation per depth, `::` unspaced,
/// no comments, no blank lines outside frontmatter and literal zones.
/// Absent assignments are skipped entirely. Values with no inline syntax
/// (absent or null list items, a literal zone nested in a composite) vanish
/// from composites; the parser never produces them there.
pub fn emit(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(fm) = &doc.frontmatter {
        out.push_str("---\n");
        out.push_str(fm);
        out.push('\n');
        out.push_str("---\n");
    }
    out.push_str("===");
    out.push_str(doc.name.as_ref());
    out.push_str("===\n");
    out.push_str("META:\n");
    for node in &doc.meta {
        emit_node(&mut out, node, 1);
    }
    for node in &doc.body {
        emit_node(&mut out, node, 0);
    }
    out.push_str("===END===\n");
    out
}

fn emit_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Assignment { key, value } => match value {
            Value::Absent => {}
            Value::LiteralZone(zone) => {
                out.push_str(&indent);
                out.push_str(key);
                out.push_str("::");
                out.push_str(&zone.fence_marker);
                if let Some(tag) = &zone.info_tag {
                    out.push_str(tag);
                }
                out.push('\n');
                if !zone.content.is_empty() {
                    out.push_str(&zone.content);
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str(&zone.fence_marker);
                out.push('\n');
            }
            other => {
                out.push_str(&indent);
                out.push_str(key);
                out.push_str("::");
                if let Some(text) = render_inline(other) {
                    out.push_str(&text);
                }
                out.push('\n');
            }
        },
        Node::Section { name, children } => {
            out.push_str(&indent);
            out.push_str(name);
            out.push_str(":\n");
            for child in children {
                emit_node(out, child, depth + 1);
            }
        }
        Node::Block { key, children } => {
            out.push_str(&indent);
            out.push_str(key);
            out.push_str(":\n");
            for child in children {
                emit_node(out, child, depth + 1);
            }
        }
    }
}

/// Inline rendering for a value on an assignment line. `None` means the
/// value has no inline syntax and is dropped from its composite.
fn render_inline(value: &Value) -> Option<String> {
    match value {
        Value::Scalar(s) => Some(render_scalar(s)),
        Value::Null | Value::Absent | Value::LiteralZone(_) => None,
        Value::List { items } => {
            let rendered: Vec<String> = items.iter().filter_map(render_inline).collect();
            Some(format!("[{}]", rendered.join(", ")))
        }
        Value::InlineMap { entries } => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|e| format!("{}={}", e.key, render_scalar(&e.value)))
                .collect();
            Some(format!("{{{}}}", rendered.join(", ")))
        }
    }
}

fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str { v } => {
            if bare_safe(v) {
                v.clone()
            } else {
                quote(v)
            }
        }
        Scalar::Num { v } => v.clone(),
        Scalar::Bool { v: true } => "true".to_string(),
        Scalar::Bool { v: false } => "false".to_string(),
    }
}

/// A string renders bare only when re-lexing it yields the same string
/// back: identifier-shaped, and not a bool or number lookalike.
fn bare_safe(v: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_./-]*$").expect("invalid regex");
    re.is_match(v) && v != "true" && v != "false" && !is_number_lexeme(v)
}

fn quote(v: &str) -> String {
    let mut out = String::with_capacity(v.len() + 2);
    out.push('"');
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
