use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the raw input of a field is interpreted before constraints run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
}

/// A single check applied to a field value.
///
/// Every variant carries an optional failure message. Messages are handlebars
/// templates rendered with `label`, `min`, `max` and `other` in scope; when the
/// message is omitted a generic one is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Constraint {
    MinLength {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        regex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Positive {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    EqualsField {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Constraint {
    /// Short identifier used in logs and test assertions.
    pub fn code(&self) -> &'static str {
        match self {
            Constraint::MinLength { .. } => "min_length",
            Constraint::MaxLength { .. } => "max_length",
            Constraint::Pattern { .. } => "pattern",
            Constraint::Range { .. } => "range",
            Constraint::Positive { .. } => "positive",
            Constraint::EqualsField { .. } => "equals_field",
        }
    }

    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            Constraint::MinLength { .. } => "{{label}} must be at least {{min}} characters",
            Constraint::MaxLength { .. } => "{{label}} must not exceed {{max}} characters",
            Constraint::Pattern { .. } => "{{label}} has an invalid format",
            Constraint::Range {
                min: Some(_),
                max: Some(_),
                ..
            } => "{{label}} must be between {{min}} and {{max}}",
            Constraint::Range { min: Some(_), .. } => "{{label}} must be at least {{min}}",
            Constraint::Range { .. } => "{{label}} must be at most {{max}}",
            Constraint::Positive { .. } => "{{label}} must be positive",
            Constraint::EqualsField { .. } => "{{label}} must match {{other}}",
        }
    }

    pub(crate) fn message(&self) -> Option<&str> {
        match self {
            Constraint::MinLength { message, .. }
            | Constraint::MaxLength { message, .. }
            | Constraint::Pattern { message, .. }
            | Constraint::Range { message, .. }
            | Constraint::Positive { message }
            | Constraint::EqualsField { message, .. } => message.as_deref(),
        }
    }

    /// Whether the check needs the value parsed as a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Constraint::Range { .. } | Constraint::Positive { .. })
    }
}

/// Declarative rules for one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_message: Option<String>,
    /// Password-style input; renderers mask the value.
    #[serde(default)]
    pub secret: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    /// Plain text field with no rules attached.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            placeholder: None,
            kind: FieldKind::Text,
            required: false,
            required_message: None,
            type_message: None,
            secret: false,
            constraints: Vec::new(),
        }
    }

    /// Numeric field with no rules attached.
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(name)
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Label used in messages; falls back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether the value must be parsed as a number before constraints run.
    pub fn expects_number(&self) -> bool {
        matches!(self.kind, FieldKind::Number)
    }
}
