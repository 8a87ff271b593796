use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::message::{MessageContext, MessageRenderer, format_number};
use crate::record::Record;
use crate::result::ValidationResult;
use crate::spec::field::{Constraint, FieldRule};
use crate::spec::form::{FormSpec, SpecError};

const REQUIRED_MESSAGE: &str = "{{label}} is required";
const NUMBER_MESSAGE: &str = "{{label}} must be a number";

/// Compiled `pattern` constraints of one rule set, keyed by their source.
#[derive(Debug, Clone, Default)]
pub struct Patterns {
    compiled: BTreeMap<String, Regex>,
}

impl Patterns {
    /// Compiles every pattern of `spec`, stopping at the first one that fails.
    pub fn compile(spec: &FormSpec) -> Result<Self, SpecError> {
        let mut compiled = BTreeMap::new();
        for (field, source) in pattern_sources(spec) {
            if compiled.contains_key(source) {
                continue;
            }
            let regex = Regex::new(source).map_err(|err| SpecError::InvalidPattern {
                field: field.name.clone(),
                pattern: source.clone(),
                reason: err.to_string(),
            })?;
            compiled.insert(source.clone(), regex);
        }
        Ok(Self { compiled })
    }

    /// Like [`Patterns::compile`] but skips patterns that fail, so an
    /// unchecked rule set can still be evaluated.
    fn lenient(spec: &FormSpec) -> Self {
        let mut compiled = BTreeMap::new();
        for (field, source) in pattern_sources(spec) {
            if compiled.contains_key(source) {
                continue;
            }
            match Regex::new(source) {
                Ok(regex) => {
                    compiled.insert(source.clone(), regex);
                }
                Err(err) => warn!(
                    form = %spec.id,
                    field = %field.name,
                    error = %err,
                    "skipping invalid pattern"
                ),
            }
        }
        Self { compiled }
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    fn get(&self, source: &str) -> Option<&Regex> {
        self.compiled.get(source)
    }
}

fn pattern_sources(spec: &FormSpec) -> impl Iterator<Item = (&FieldRule, &String)> {
    spec.fields.iter().flat_map(|field| {
        field.constraints.iter().filter_map(move |constraint| match constraint {
            Constraint::Pattern { regex, .. } => Some((field, regex)),
            _ => None,
        })
    })
}

/// Evaluates every field rule of `spec` against `record`.
///
/// Fields are checked in declaration order. A required field that is empty
/// reports its required message and nothing else; otherwise the first failing
/// constraint wins. The result is empty iff the record passes. Patterns are
/// compiled for this call only; a pattern that does not compile is logged and
/// skipped. Use [`evaluate_with`] to reuse compiled patterns.
pub fn evaluate(spec: &FormSpec, record: &Record) -> ValidationResult {
    evaluate_with(spec, &Patterns::lenient(spec), record)
}

/// Same as [`evaluate`] with patterns compiled ahead of time.
pub fn evaluate_with(spec: &FormSpec, patterns: &Patterns, record: &Record) -> ValidationResult {
    let renderer = MessageRenderer::new();
    let mut result = ValidationResult::new();

    for field in &spec.fields {
        if let Some(message) = validate_field(spec, patterns, field, record, &renderer) {
            result.insert(field.name.clone(), message);
        }
    }

    debug!(form = %spec.id, errors = result.len(), "evaluated record");
    result
}

fn validate_field(
    spec: &FormSpec,
    patterns: &Patterns,
    field: &FieldRule,
    record: &Record,
    renderer: &MessageRenderer,
) -> Option<String> {
    let value = record.get(&field.name);
    let label = field.display_label();

    if field.required && value.is_empty() {
        let template = field.required_message.as_deref().unwrap_or(REQUIRED_MESSAGE);
        return Some(renderer.render(template, &MessageContext::for_label(label)));
    }

    let number = if field.expects_number() {
        match parse_number(value) {
            Some(number) => Some(number),
            None => return Some(type_mismatch(field, renderer)),
        }
    } else {
        None
    };

    field.constraints.iter().find_map(|constraint| {
        enforce_constraint(spec, patterns, field, record, number, constraint, renderer)
    })
}

fn enforce_constraint(
    spec: &FormSpec,
    patterns: &Patterns,
    field: &FieldRule,
    record: &Record,
    number: Option<f64>,
    constraint: &Constraint,
    renderer: &MessageRenderer,
) -> Option<String> {
    let value = record.get(&field.name);
    let ctx = MessageContext::for_label(field.display_label());

    let number = if constraint.is_numeric() {
        match number.or_else(|| parse_number(value)) {
            Some(number) => number,
            None => return Some(type_mismatch(field, renderer)),
        }
    } else {
        0.0
    };

    let failure = match constraint {
        Constraint::MinLength { min, .. } => {
            (char_len(value) < *min).then(|| ctx.with_min(min))
        }
        Constraint::MaxLength { max, .. } => {
            (char_len(value) > *max).then(|| ctx.with_max(max))
        }
        Constraint::Pattern { regex, .. } => patterns
            .get(regex)
            .and_then(|regex| (!regex.is_match(value)).then_some(ctx)),
        Constraint::Range { min, max, .. } => {
            let below = min.is_some_and(|min| number < min);
            let above = max.is_some_and(|max| number > max);
            (below || above).then(|| {
                let mut ctx = ctx;
                if let Some(min) = min {
                    ctx = ctx.with_min(format_number(*min));
                }
                if let Some(max) = max {
                    ctx = ctx.with_max(format_number(*max));
                }
                ctx
            })
        }
        Constraint::Positive { .. } => (number <= 0.0).then_some(ctx),
        Constraint::EqualsField { field: other, .. } => {
            let other_label = spec
                .field(other)
                .map(FieldRule::display_label)
                .unwrap_or(other);
            (value != record.get(other)).then(|| ctx.with_other(other_label))
        }
    }?;

    let template = constraint
        .message()
        .unwrap_or_else(|| constraint.default_message());
    Some(renderer.render(template, &failure))
}

fn type_mismatch(field: &FieldRule, renderer: &MessageRenderer) -> String {
    let template = field.type_message.as_deref().unwrap_or(NUMBER_MESSAGE);
    renderer.render(template, &MessageContext::for_label(field.display_label()))
}

/// Parses a finite number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
