use serde_json::json;
use waymark_ast::{Document, DocumentName, LiteralZone, MapEntry, Node, Scalar, Value};

#[test]
fn scalar_serializes_to_golden_json() {
    assert_eq!(
        serde_json::to_string(&Scalar::str("REQUEST")).unwrap(),
        r#"{"t":"str","v":"REQUEST"}"#
    );
    assert_eq!(
        serde_json::to_string(&Scalar::number("1.50").unwrap()).unwrap(),
        r#"{"t":"num","v":"1.50"}"#
    );
    assert_eq!(
        serde_json::to_string(&Scalar::bool(true)).unwrap(),
        r#"{"t":"bool","v":true}"#
    );
}

#[test]
fn value_variants_are_tagged() {
    assert_eq!(
        serde_json::to_string(&Value::str("x")).unwrap(),
        r#"{"kind":"scalar","t":"str","v":"x"}"#
    );
    assert_eq!(
        serde_json::to_string(&Value::Absent).unwrap(),
        r#"{"kind":"absent"}"#
    );
    assert_eq!(
        serde_json::to_string(&Value::Null).unwrap(),
        r#"{"kind":"null"}"#
    );
    let list = Value::List {
        items: vec![Value::str("a"), Value::bool(false)],
    };
    assert_eq!(
        serde_json::to_string(&list).unwrap(),
        r#"{"kind":"list","items":[{"kind":"scalar","t":"str","v":"a"},{"kind":"scalar","t":"bool","v":false}]}"#
    );
}

#[test]
fn literal_zone_shape_is_stable() {
    let zone = LiteralZone::new("hello", Some("python".into()), "```").unwrap();
    assert_eq!(
        serde_json::to_string(&Value::from(zone)).unwrap(),
        r#"{"kind":"literal_zone","content":"hello","info_tag":"python","fence_marker":"```"}"#
    );
    // Without an info tag the field disappears instead of carrying null.
    let bare = LiteralZone::new("", None, "```").unwrap();
    assert_eq!(
        serde_json::to_string(&bare).unwrap(),
        r#"{"content":"","fence_marker":"```"}"#
    );
}

#[test]
fn inline_map_preserves_entry_order() {
    let map = Value::InlineMap {
        entries: vec![
            MapEntry {
                key: "retries".into(),
                value: Scalar::number("3").unwrap(),
            },
            MapEntry {
                key: "backoff".into(),
                value: Scalar::str("exp"),
            },
        ],
    };
    let serialized = serde_json::to_value(&map).unwrap();
    let expected = json!({
        "kind": "inline_map",
        "entries": [
            {"key": "retries", "value": {"t": "num", "v": "3"}},
            {"key": "backoff", "value": {"t": "str", "v": "exp"}}
        ]
    });
    assert_eq!(serialized, expected);
}

#[test]
fn document_round_trips_through_serde() {
    let doc = Document::new(
        DocumentName::parse("TASK").unwrap(),
        vec![Node::assignment("TYPE", Value::str("REQUEST"))],
        vec![Node::container(
            "PAYLOAD",
            vec![Node::assignment("count", Value::number("2").unwrap())],
        )],
    )
    .with_frontmatter("owner: kernel\n");

    let serialized = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&serialized).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn node_tags_distinguish_sections_and_blocks() {
    let section = Node::container("PAYLOAD", vec![]);
    assert_eq!(
        serde_json::to_string(&section).unwrap(),
        r#"{"node":"section","name":"PAYLOAD","children":[]}"#
    );
    let block = Node::container("retry", vec![]);
    assert_eq!(
        serde_json::to_string(&block).unwrap(),
        r#"{"node":"block","key":"retry","children":[]}"#
    );
}
