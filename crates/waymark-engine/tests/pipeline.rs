use waymark_engine::{
    canonicalize, canonicalize_with_schema, IssueCode, RepairTier, ValidationStatus,
};
use waymark_schemas::{Constraint, FieldRule, FieldSpec, SchemaDefinition, TypeTag};

fn make_schema(deny_unknown: bool) -> SchemaDefinition {
    SchemaDefinition::new(
        "task",
        "1",
        vec![
            FieldRule::new(
                "META.TYPE",
                FieldSpec::required().with(Constraint::OneOf {
                    allowed: vec!["REQUEST".to_string(), "REPLY".to_string()],
                }),
            ),
            FieldRule::new(
                "PAYLOAD.retries",
                FieldSpec::required().with(Constraint::TypeTag {
                    tag: TypeTag::Number,
                }),
            ),
            FieldRule::new(
                "PAYLOAD.snippet",
                FieldSpec::required()
                    .with(Constraint::LiteralZone)
                    .with(Constraint::ZoneTag {
                        tag: "python".to_string(),
                    }),
            ),
        ],
        deny_unknown,
    )
    .unwrap()
}

#[test]
fn test_lenient_input_canonicalizes_with_a_full_accounting() {
    let text = "\u{feff}===TASK===\r\nMETA:\r\n    TYPE::REQUEST # queued\r\n    WHO::\"Rene\u{301}\"\r\nPAYLOAD:\r\n  retries::\"3\"\r\n  snippet::```python\r\nprint('hi')\r\n```\r\n===END===\r\n";
    let outcome = canonicalize(text).unwrap();

    assert_eq!(
        outcome.canonical_text,
        "===TASK===\nMETA:\n  TYPE::REQUEST\n  WHO::\"Ren\u{e9}\"\nPAYLOAD:\n  retries::\"3\"\n  snippet::```python\nprint('hi')\n  ```\n===END===\n"
    );

    // One dropped comment, one NFC-normalized line, ordered by line.
    assert_eq!(outcome.log.entries.len(), 2);
    assert_eq!(outcome.log.entries[0].location, "line 3");
    assert_eq!(outcome.log.entries[0].before, "# queued");
    assert_eq!(outcome.log.entries[0].after, "");
    assert_eq!(outcome.log.entries[1].location, "line 4");
    assert!(outcome.log.entries[1].before.contains("\\u{301}"));
    assert!(outcome.log.entries[1].after.contains('\u{e9}'));
    assert!(outcome
        .log
        .entries
        .iter()
        .all(|e| e.tier == RepairTier::Normalization && !e.semantics_changed));

    let layout = outcome.log.layout.as_ref().unwrap();
    assert_ne!(layout.input.b64, layout.canonical.b64);
    assert!(outcome.validation.valid);
    assert_eq!(
        outcome.validation.validation_status,
        ValidationStatus::Unvalidated
    );
    assert_eq!(outcome.validation.literal_zone_count, 1);
}

#[test]
fn test_canonical_text_is_a_fixed_point_of_the_pipeline() {
    let text = "\u{feff}===TASK===\nMETA:\n  TYPE::REQUEST # note\nPAYLOAD:\n  retries::\"3\"\n===END===\n";
    let first = canonicalize(text).unwrap();
    let second = canonicalize(&first.canonical_text).unwrap();

    assert_eq!(second.canonical_text, first.canonical_text);
    assert!(second.log.entries.is_empty());
    assert!(second.log.layout.is_none());
}

#[test]
fn test_schema_run_repairs_validates_and_stamps_the_log() {
    let text = "===TASK===\nMETA:\n  TYPE::request\nPAYLOAD:\n  retries::\"3\"\n  extra::1\n  snippet::```python\nprint('hi')\n```\n===END===\n";
    let outcome = canonicalize_with_schema(text, &make_schema(true), true).unwrap();

    assert!(outcome.canonical_text.contains("  TYPE::REQUEST\n"));
    assert!(outcome.canonical_text.contains("  retries::3\n"));
    assert!(outcome.validation.valid);
    assert_eq!(outcome.validation.warnings.len(), 1);
    assert_eq!(outcome.validation.warnings[0].code, IssueCode::UnknownField);
    assert_eq!(outcome.validation.warnings[0].path, "PAYLOAD.extra");

    assert_eq!(outcome.log.profile, "waymark-canonical-v1");
    let locations: Vec<&str> = outcome
        .log
        .entries
        .iter()
        .map(|e| e.location.as_str())
        .collect();
    assert_eq!(locations, vec!["META.TYPE", "PAYLOAD.retries"]);
    assert_eq!(outcome.log.entries[0].tier, RepairTier::Repair);
    assert!(!outcome.log.entries[0].semantics_changed);
    assert!(outcome.log.entries[1].semantics_changed);
    assert_eq!(outcome.log.zone_receipts.len(), 1);
    assert_eq!(outcome.log.zone_receipts[0].location, "PAYLOAD.snippet");
    assert!(outcome.log.misses.is_empty());
}

#[test]
fn test_dry_run_reports_without_rewriting() {
    let text = "===TASK===\nMETA:\n  TYPE::request\nPAYLOAD:\n  retries::\"3\"\n  snippet::```python\nprint('hi')\n```\n===END===\n";
    let outcome = canonicalize_with_schema(text, &make_schema(false), false).unwrap();

    assert!(outcome.canonical_text.contains("  TYPE::request\n"));
    assert!(outcome.canonical_text.contains("  retries::\"3\"\n"));
    assert!(!outcome.validation.valid);
    let codes: Vec<IssueCode> = outcome.validation.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![IssueCode::EnumMismatch, IssueCode::TypeMismatch]);

    // No repairs ran, but zones still get their receipts.
    assert!(outcome.log.entries.is_empty());
    assert_eq!(outcome.log.zone_receipts.len(), 1);
}

#[test]
fn test_validation_judges_the_repaired_tree() {
    let text = "===TASK===\nMETA:\n  TYPE::request\nPAYLOAD:\n  retries::3\n  snippet::```python\nx\n```\n===END===\n";
    let schema = make_schema(false);

    let applied = canonicalize_with_schema(text, &schema, true).unwrap();
    let dry = canonicalize_with_schema(text, &schema, false).unwrap();
    assert!(applied.validation.valid);
    assert!(!dry.validation.valid);
}

#[test]
fn test_fatal_errors_surface_with_their_stage_codes() {
    let tab = canonicalize("===TASK===\nMETA:\n\tTYPE::x\n===END===\n").unwrap_err();
    assert_eq!(tab.code().to_string(), "ILLEGAL_CHAR/TAB");
    assert!(tab.to_string().contains("tabs are not allowed"));

    let dup = canonicalize_with_schema(
        "===TASK===\nMETA:\n  TYPE::x\n  TYPE::y\n===END===\n",
        &make_schema(false),
        true,
    )
    .unwrap_err();
    assert_eq!(dup.code().to_string(), "STRUCTURE/DUPLICATE_KEY");
}
