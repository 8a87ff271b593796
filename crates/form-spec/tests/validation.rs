use serde_json::json;

use form_spec::{Constraint, FieldRule, FormSpec, Record, SpecError, evaluate};

fn fixture(name: &str) -> &'static str {
    match name {
        "account_form" => include_str!("../tests/fixtures/account_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn account_form() -> FormSpec {
    serde_json::from_str(fixture("account_form")).expect("deserialize")
}

fn valid_record() -> Record {
    Record::from_json(&json!({
        "username": "ada_l",
        "age": "36",
        "password": "analytical",
        "confirm": "analytical"
    }))
}

#[test]
fn fixture_passes_spec_check() {
    assert_eq!(account_form().check(), Ok(()));
}

#[test]
fn valid_record_yields_empty_result() {
    let result = evaluate(&account_form(), &valid_record());
    assert!(result.is_valid(), "unexpected errors: {:?}", result);
}

#[test]
fn missing_required_reports_only_required_message() {
    let record = valid_record().with("username", "");
    let result = evaluate(&account_form(), &record);
    assert_eq!(result.len(), 1);
    assert_eq!(result.get("username"), Some("Username is required"));
}

#[test]
fn absent_fields_are_treated_as_empty() {
    let result = evaluate(&account_form(), &Record::new());
    assert_eq!(result.get("username"), Some("Username is required"));
    assert_eq!(result.get("age"), Some("Age is required"));
    assert_eq!(result.get("confirm"), Some("Please confirm the password"));
    assert!(!result.contains("nickname"));
}

#[test]
fn first_failing_constraint_wins() {
    // too short and also breaks the pattern: only the length message is kept
    let record = valid_record().with("username", "A");
    let result = evaluate(&account_form(), &record);
    assert_eq!(
        result.get("username"),
        Some("Username must be at least 3 characters")
    );

    let record = valid_record().with("username", "Ada_L");
    let result = evaluate(&account_form(), &record);
    assert_eq!(
        result.get("username"),
        Some("Use lowercase letters, digits or _")
    );
}

#[test]
fn failing_fields_follow_declaration_order() {
    let spec = account_form();
    let result = evaluate(&spec, &Record::new());
    assert_eq!(
        result.fields().collect::<Vec<_>>(),
        vec!["age", "confirm", "password", "username"]
    );
    assert_eq!(
        result.fields_in(&spec).collect::<Vec<_>>(),
        vec!["username", "age", "password", "confirm"]
    );
}

#[test]
fn max_length_uses_custom_message() {
    let record = valid_record().with("username", "a_very_long_name");
    let result = evaluate(&account_form(), &record);
    assert_eq!(result.get("username"), Some("Username is too long"));
}

#[test]
fn numeric_fields_distinguish_type_and_range_failures() {
    let spec = account_form();

    let result = evaluate(&spec, &valid_record().with("age", "abc"));
    assert_eq!(result.get("age"), Some("Age must be a number"));

    let result = evaluate(&spec, &valid_record().with("age", "-4"));
    assert_eq!(result.get("age"), Some("Age must be positive"));

    let result = evaluate(&spec, &valid_record().with("age", "17"));
    assert_eq!(result.get("age"), Some("Age must be between 18 and 120"));

    let result = evaluate(&spec, &valid_record().with("age", "18"));
    assert!(!result.contains("age"));
}

#[test]
fn numbers_from_json_are_accepted() {
    let record = Record::from_json(&json!({
        "username": "ada_l",
        "age": 36,
        "password": "analytical",
        "confirm": "analytical"
    }));
    assert!(evaluate(&account_form(), &record).is_valid());
}

#[test]
fn equals_field_compares_against_other_field() {
    let spec = account_form();
    let result = evaluate(&spec, &valid_record().with("confirm", "analytica"));
    assert_eq!(result.get("confirm"), Some("Confirmation must match Password"));

    let result = evaluate(&spec, &valid_record());
    assert!(!result.contains("confirm"));
}

#[test]
fn evaluation_is_idempotent() {
    let spec = account_form();
    let record = valid_record().with("age", "abc").with("confirm", "x");
    assert_eq!(evaluate(&spec, &record), evaluate(&spec, &record));
}

#[test]
fn optional_empty_field_still_runs_constraints() {
    let spec = FormSpec {
        id: "optional".into(),
        title: "Optional".into(),
        subtitle: None,
        fields: vec![FieldRule::text("code").with_constraint(Constraint::MinLength {
            min: 2,
            message: Some("Code must be at least 2 characters".into()),
        })],
    };
    let result = evaluate(&spec, &Record::new());
    assert_eq!(result.get("code"), Some("Code must be at least 2 characters"));
}

#[test]
fn check_rejects_unknown_reference() {
    let spec = FormSpec {
        id: "broken".into(),
        title: "Broken".into(),
        subtitle: None,
        fields: vec![FieldRule::text("confirm").with_constraint(Constraint::EqualsField {
            field: "password".into(),
            message: None,
        })],
    };
    assert_eq!(
        spec.check(),
        Err(SpecError::UnknownReference {
            field: "confirm".into(),
            other: "password".into(),
        })
    );
}

#[test]
fn check_rejects_duplicates_and_bad_patterns() {
    let duplicated = FormSpec {
        id: "dup".into(),
        title: "Dup".into(),
        subtitle: None,
        fields: vec![FieldRule::text("a"), FieldRule::text("a")],
    };
    assert!(matches!(
        duplicated.check(),
        Err(SpecError::DuplicateField { .. })
    ));

    let bad_pattern = FormSpec {
        id: "pattern".into(),
        title: "Pattern".into(),
        subtitle: None,
        fields: vec![FieldRule::text("a").with_constraint(Constraint::Pattern {
            regex: "([a-z".into(),
            message: None,
        })],
    };
    assert!(matches!(
        bad_pattern.check(),
        Err(SpecError::InvalidPattern { .. })
    ));
}

#[test]
fn check_rejects_inverted_bounds() {
    let spec = FormSpec {
        id: "bounds".into(),
        title: "Bounds".into(),
        subtitle: None,
        fields: vec![
            FieldRule::number("n").with_constraint(Constraint::Range {
                min: Some(10.0),
                max: Some(1.0),
                message: None,
            }),
            FieldRule::text("s")
                .with_constraint(Constraint::MinLength {
                    min: 5,
                    message: None,
                })
                .with_constraint(Constraint::MaxLength {
                    max: 2,
                    message: None,
                }),
        ],
    };
    assert!(matches!(
        spec.check(),
        Err(SpecError::InvertedBounds { .. })
    ));
}

#[test]
fn rule_set_round_trips_through_json() {
    let spec = account_form();
    let encoded = serde_json::to_value(&spec).expect("encode");
    assert_eq!(encoded["fields"][0]["constraints"][0]["rule"], "min_length");
    let decoded: FormSpec = serde_json::from_value(encoded).expect("decode");
    assert_eq!(decoded, spec);
}
