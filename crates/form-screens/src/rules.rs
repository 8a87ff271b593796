use form_spec::{FormSpec, SpecError};
use thiserror::Error;

const EMPLOYEE_SPEC: &str = include_str!("../forms/employee.form.json");
const SIGN_IN_SPEC: &str = include_str!("../forms/signin.form.json");
const SIGN_UP_SPEC: &str = include_str!("../forms/signup.form.json");

/// Ids of the embedded rule sets, in tab order.
pub const FORM_IDS: [&str; 3] = ["employee", "signin", "signup"];

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("failed to parse rule set '{0}'")]
    Parse(String, #[source] serde_json::Error),
    #[error("rule set '{0}' is malformed")]
    Malformed(String, #[source] SpecError),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
}

fn load(id: &str, json: &str) -> Result<FormSpec, ScreenError> {
    let spec: FormSpec =
        serde_json::from_str(json).map_err(|err| ScreenError::Parse(id.to_string(), err))?;
    spec.check()
        .map_err(|err| ScreenError::Malformed(id.to_string(), err))?;
    Ok(spec)
}

pub fn employee() -> Result<FormSpec, ScreenError> {
    load("employee", EMPLOYEE_SPEC)
}

pub fn sign_in() -> Result<FormSpec, ScreenError> {
    load("signin", SIGN_IN_SPEC)
}

pub fn sign_up() -> Result<FormSpec, ScreenError> {
    load("signup", SIGN_UP_SPEC)
}

pub fn by_name(form_id: &str) -> Result<FormSpec, ScreenError> {
    match form_id {
        "employee" => employee(),
        "signin" => sign_in(),
        "signup" => sign_up(),
        other => Err(ScreenError::FormUnavailable(other.to_string())),
    }
}

/// Parses a rule set supplied from outside the crate and checks it.
pub fn from_json(json: &str) -> Result<FormSpec, ScreenError> {
    let spec: FormSpec =
        serde_json::from_str(json).map_err(|err| ScreenError::Parse("<custom>".into(), err))?;
    let id = spec.id.clone();
    spec.check().map_err(|err| ScreenError::Malformed(id, err))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_rule_sets_load_and_match_their_ids() {
        for id in FORM_IDS {
            let spec = by_name(id).expect("embedded rule set");
            assert_eq!(spec.id, id);
        }
    }

    #[test]
    fn unknown_form_is_rejected() {
        assert!(matches!(
            by_name("payroll"),
            Err(ScreenError::FormUnavailable(_))
        ));
    }

    #[test]
    fn custom_rule_set_is_checked() {
        let json = r#"{
            "id": "bad",
            "title": "Bad",
            "fields": [
                { "name": "confirm", "constraints": [ { "rule": "equals_field", "field": "nope" } ] }
            ]
        }"#;
        assert!(matches!(from_json(json), Err(ScreenError::Malformed(..))));
    }
}
