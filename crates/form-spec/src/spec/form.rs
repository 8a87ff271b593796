use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::field::{Constraint, FieldRule};
use crate::validate::Patterns;

/// Problems found in a rule set before it is handed to a controller.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("form '{form}' declares field '{field}' more than once")]
    DuplicateField { form: String, field: String },
    #[error("field '{field}' compares against unknown field '{other}'")]
    UnknownReference { field: String, other: String },
    #[error("field '{field}' compares against itself")]
    SelfReference { field: String },
    #[error("field '{field}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },
    #[error("field '{field}' has a {code} constraint whose minimum exceeds its maximum")]
    InvertedBounds { field: String, code: &'static str },
}

/// Ordered rule set for one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub fields: Vec<FieldRule>,
}

impl FormSpec {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Reject rule sets that the evaluator cannot interpret faithfully.
    pub fn check(&self) -> Result<(), SpecError> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SpecError::DuplicateField {
                    form: self.id.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for field in &self.fields {
            for constraint in &field.constraints {
                self.check_constraint(field, constraint)?;
            }
        }
        Patterns::compile(self)?;
        Ok(())
    }

    fn check_constraint(
        &self,
        field: &FieldRule,
        constraint: &Constraint,
    ) -> Result<(), SpecError> {
        match constraint {
            Constraint::EqualsField { field: other, .. } => {
                if other == &field.name {
                    return Err(SpecError::SelfReference {
                        field: field.name.clone(),
                    });
                }
                if self.field(other).is_none() {
                    return Err(SpecError::UnknownReference {
                        field: field.name.clone(),
                        other: other.clone(),
                    });
                }
            }
            Constraint::Range {
                min: Some(min),
                max: Some(max),
                ..
            } if min > max => {
                return Err(SpecError::InvertedBounds {
                    field: field.name.clone(),
                    code: constraint.code(),
                });
            }
            _ => {}
        }

        if let Constraint::MaxLength { max, .. } = constraint {
            let min_len = field.constraints.iter().find_map(|other| match other {
                Constraint::MinLength { min, .. } => Some(*min),
                _ => None,
            });
            if let Some(min) = min_len
                && min > *max
            {
                return Err(SpecError::InvertedBounds {
                    field: field.name.clone(),
                    code: "length",
                });
            }
        }
        Ok(())
    }
}
