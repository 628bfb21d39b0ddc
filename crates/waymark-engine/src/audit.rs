//! Derived audit facts for the repair engine.
//!
//! The audit trail is computed, not maintained: after a repair pass the
//! rebuilt tree is diffed against the input tree, and the diff sites are
//! what the log reports. The transform separately records what it planned
//! to change; [`crate::repair`] reconciles the two and treats any
//! disagreement as an internal defect.

use waymark_ast::{Document, MapEntry, Node, NodePath, Scalar, Value};

/// One observed difference between the input tree and the rebuilt tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiffSite {
    /// Dotted path of the changed leaf, keyed by the input tree's names.
    pub location: String,
    /// Rendered value before the pass.
    pub before: String,
    /// Rendered value after.
    pub after: String,
}

/// Diffs two documents at leaf granularity, in document order.
pub(crate) fn diff_documents(old: &Document, new: &Document) -> Vec<DiffSite> {
    let mut sites = Vec::new();
    diff_nodes(&old.meta, &new.meta, &NodePath::field("META"), &mut sites);
    diff_nodes(&old.body, &new.body, &NodePath::root(), &mut sites);
    sites
}

fn diff_nodes(old: &[Node], new: &[Node], parent: &NodePath, sites: &mut Vec<DiffSite>) {
    assert_eq!(
        old.len(),
        new.len(),
        "internal defect: repair changed the node count under {}",
        parent
    );
    for (o, n) in old.iter().zip(new) {
        assert_eq!(
            o.key_name(),
            n.key_name(),
            "internal defect: repair renamed {} under {}",
            o.key_name(),
            parent
        );
        match (o, n) {
            (Node::Assignment { key, value: ov }, Node::Assignment { value: nv, .. }) => {
                diff_value(ov, nv, &parent.push_field(key), sites);
            }
            _ => diff_nodes(o.children(), n.children(), &parent.push_field(o.key_name()), sites),
        }
    }
}

fn diff_value(old: &Value, new: &Value, path: &NodePath, sites: &mut Vec<DiffSite>) {
    if old == new {
        return;
    }
    match (old, new) {
        (Value::List { items: oi }, Value::List { items: ni }) if oi.len() == ni.len() => {
            for (i, (o, n)) in oi.iter().zip(ni).enumerate() {
                diff_value(o, n, &path.push_index(i), sites);
            }
        }
        (Value::InlineMap { entries: oe }, Value::InlineMap { entries: ne })
            if oe.len() == ne.len() =>
        {
            for (o, n) in oe.iter().zip(ne) {
                if o != n {
                    sites.push(DiffSite {
                        location: path.push_field(&o.key).to_string(),
                        before: render_entry(o),
                        after: render_entry(n),
                    });
                }
            }
        }
        _ => sites.push(DiffSite {
            location: path.to_string(),
            before: render_leaf(old),
            after: render_leaf(new),
        }),
    }
}

/// Renders a value for the audit log. Zone content never appears here, only
/// its tag and size; the digests in the zone receipts are the record of the
/// bytes themselves.
pub(crate) fn render_leaf(value: &Value) -> String {
    match value {
        Value::Scalar(scalar) => render_scalar(scalar),
        Value::Null => "null".to_string(),
        Value::Absent => "absent".to_string(),
        Value::LiteralZone(zone) => match &zone.info_tag {
            Some(tag) => format!("literal zone (tag {:?}, {} bytes)", tag, zone.content.len()),
            None => format!("literal zone ({} bytes)", zone.content.len()),
        },
        Value::List { items } => format!("list of {}", items.len()),
        Value::InlineMap { entries } => format!("inline map of {}", entries.len()),
    }
}

fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str { v } => format!("{:?}", v),
        Scalar::Num { v } => v.clone(),
        Scalar::Bool { v } => v.to_string(),
    }
}

fn render_entry(entry: &MapEntry) -> String {
    format!("{}={}", entry.key, render_scalar(&entry.value))
}
