use serde_json::json;
use waymark_ast::{Document, DocumentName, Node, Value};
use waymark_engine::{
    canonicalize, validate, CanonicalOutcome, ContentDigest, DigestAlg, RepairEntry, RepairLog,
    RepairMiss, RepairTier, ValidationStatus, ZoneReceipt, CANONICAL_PROFILE,
};
use waymark_schemas::{Constraint, FieldRule, FieldSpec, SchemaDefinition};

#[test]
fn content_digest_serializes_to_golden_json() {
    let digest = ContentDigest {
        alg: DigestAlg::Sha256,
        b64: "Zm9vYmFy".into(),
    };

    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","b64":"Zm9vYmFy"}"#
    );
}

#[test]
fn codes_and_tiers_serialize_screaming_snake() {
    assert_eq!(
        serde_json::to_string(&RepairTier::Normalization).unwrap(),
        r#""NORMALIZATION""#
    );
    assert_eq!(
        serde_json::to_string(&RepairTier::Repair).unwrap(),
        r#""REPAIR""#
    );
    assert_eq!(
        serde_json::to_string(&ValidationStatus::Unvalidated).unwrap(),
        r#"{"status":"unvalidated"}"#
    );
}

#[test]
fn validation_result_matches_expected_shape() {
    let doc = Document::new(
        DocumentName::parse("TASK").unwrap(),
        vec![Node::assignment("TYPE", Value::str("reply"))],
        vec![],
    );
    let schema = SchemaDefinition::new(
        "task",
        "1",
        vec![FieldRule::new(
            "META.TYPE",
            FieldSpec::required().with(Constraint::OneOf {
                allowed: vec!["REQUEST".to_string()],
            }),
        )],
        false,
    )
    .unwrap();

    let result = validate(&doc, &schema);
    let serialized = serde_json::to_value(&result).unwrap();
    let expected = json!({
        "valid": false,
        "errors": [{
            "path": "META.TYPE",
            "code": "ENUM_MISMATCH",
            "message": "\"reply\" is not one of [REQUEST]; use one of the listed variants verbatim"
        }],
        "warnings": [],
        "validation_status": {"status": "validated", "schema": "task", "version": "1"},
        "literal_zone_count": 0,
        "literal_zones_validated": false
    });

    assert_eq!(serialized, expected);
}

#[test]
fn repair_entry_and_miss_serialize_to_golden_json() {
    let entry = RepairEntry {
        location: "META.TYPE".to_string(),
        before: "\"request\"".to_string(),
        after: "\"REQUEST\"".to_string(),
        tier: RepairTier::Repair,
        semantics_changed: false,
    };
    assert_eq!(
        serde_json::to_string(&entry).unwrap(),
        r#"{"location":"META.TYPE","before":"\"request\"","after":"\"REQUEST\"","tier":"REPAIR","semantics_changed":false}"#
    );

    let miss = RepairMiss {
        location: "PAYLOAD.retries".to_string(),
        reason: "cannot read \"many\" as a number; write a bare lexeme like -3 or 1.50e3"
            .to_string(),
        tier: RepairTier::Repair,
    };
    let serialized = serde_json::to_value(&miss).unwrap();
    assert_eq!(serialized["location"], "PAYLOAD.retries");
    assert_eq!(serialized["tier"], "REPAIR");
}

#[test]
fn empty_log_omits_its_optional_sections() {
    let log = RepairLog {
        profile: CANONICAL_PROFILE.to_string(),
        entries: Vec::new(),
        misses: Vec::new(),
        zone_receipts: Vec::new(),
        layout: None,
    };

    let serialized = serde_json::to_string(&log).unwrap();
    assert_eq!(
        serialized,
        r#"{"profile":"waymark-canonical-v1","entries":[]}"#
    );
    let back: RepairLog = serde_json::from_str(&serialized).unwrap();
    assert_eq!(back, log);
}

#[test]
fn zone_receipt_carries_both_digests() {
    let receipt = ZoneReceipt {
        location: "PAYLOAD.snippet".to_string(),
        digest_before: ContentDigest {
            alg: DigestAlg::Sha256,
            b64: "Zm9v".into(),
        },
        digest_after: ContentDigest {
            alg: DigestAlg::Sha256,
            b64: "Zm9v".into(),
        },
    };

    let serialized = serde_json::to_value(&receipt).unwrap();
    let expected = json!({
        "location": "PAYLOAD.snippet",
        "digest_before": {"alg": "sha-256", "b64": "Zm9v"},
        "digest_after": {"alg": "sha-256", "b64": "Zm9v"}
    });
    assert_eq!(serialized, expected);
}

#[test]
fn canonical_outcome_round_trips_through_json() {
    let text = "===TASK===\nMETA:\n  TYPE::REQUEST # note\nPAYLOAD:\n  snippet::```python\nprint('hi')\n```\n===END===\n";
    let outcome = canonicalize(text).unwrap();

    let value = serde_json::to_value(&outcome).unwrap();
    let back: CanonicalOutcome = serde_json::from_value(value).unwrap();
    assert_eq!(back, outcome);
}
