use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use crate::record::Record;
use crate::result::ValidationResult;
use crate::spec::form::{FormSpec, SpecError};
use crate::validate::{Patterns, evaluate_with};

/// Lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Pristine,
    Editing,
    Invalid,
    Valid,
    Submitted,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Pristine => "pristine",
            FormState::Editing => "editing",
            FormState::Invalid => "invalid",
            FormState::Valid => "valid",
            FormState::Submitted => "submitted",
        }
    }
}

/// Raised by a submit action to abort after validation passed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SubmitBlocked {
    pub reason: String,
}

impl SubmitBlocked {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// What happened to a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; holds the full result.
    Invalid(ValidationResult),
    /// Validation passed but the action refused to continue.
    Blocked(String),
    Submitted,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Owns the live record of a form and decides when a submit may proceed.
#[derive(Debug, Clone)]
pub struct FormController {
    spec: FormSpec,
    patterns: Patterns,
    record: Record,
    touched: BTreeSet<String>,
    result: ValidationResult,
    submit_attempted: bool,
    state: FormState,
    flags: BTreeMap<String, bool>,
}

impl FormController {
    /// Checks `spec` and compiles its patterns once for every later event.
    pub fn new(spec: FormSpec) -> Result<Self, SpecError> {
        spec.check()?;
        let patterns = Patterns::compile(&spec)?;
        let record = Record::empty_for(&spec);
        let result = evaluate_with(&spec, &patterns, &record);
        Ok(Self {
            spec,
            patterns,
            record,
            touched: BTreeSet::new(),
            result,
            submit_attempted: false,
            state: FormState::Pristine,
            flags: BTreeMap::new(),
        })
    }

    /// Registers a presentation toggle with its initial value.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    fn evaluate(&self) -> ValidationResult {
        evaluate_with(&self.spec, &self.patterns, &self.record)
    }

    /// Field-change event.
    pub fn change(&mut self, field: &str, value: impl Into<String>) {
        self.record.set(field, value);
        self.result = self.evaluate();
        self.state = FormState::Editing;
    }

    /// Blur event: the field becomes touched and its error visible.
    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.result = self.evaluate();
        self.state = if self.result.is_valid() {
            FormState::Valid
        } else {
            FormState::Invalid
        };
    }

    /// Errors the user should see: touched fields only, or every field once a
    /// submit was attempted.
    pub fn errors(&self) -> ValidationResult {
        let mut visible = self.result.clone();
        if !self.submit_attempted {
            visible.retain_fields(|field| self.touched.contains(field));
        }
        visible
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        if self.submit_attempted || self.touched.contains(field) {
            self.result.get(field)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    /// Marks every field touched, re-evaluates and runs `action` only when the
    /// record passes.
    pub fn submit<F>(&mut self, action: F) -> SubmitOutcome
    where
        F: FnOnce(&Record) -> Result<(), SubmitBlocked>,
    {
        self.submit_attempted = true;
        let names: Vec<String> = self.spec.field_names().map(String::from).collect();
        self.touched.extend(names);
        self.result = self.evaluate();

        if !self.result.is_valid() {
            self.state = FormState::Invalid;
            debug!(form = %self.spec.id, errors = self.result.len(), "submit rejected");
            return SubmitOutcome::Invalid(self.result.clone());
        }

        match action(&self.record) {
            Ok(()) => {
                self.state = FormState::Submitted;
                SubmitOutcome::Submitted
            }
            Err(blocked) => {
                self.state = FormState::Valid;
                SubmitOutcome::Blocked(blocked.reason)
            }
        }
    }

    /// Back to the initial empty values; flags keep their current value.
    pub fn reset(&mut self) {
        self.record = Record::empty_for(&self.spec);
        self.touched.clear();
        self.submit_attempted = false;
        self.result = self.evaluate();
        self.state = FormState::Pristine;
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    /// Flips a toggle and returns its new value.
    pub fn toggle_flag(&mut self, name: &str) -> bool {
        let value = !self.flag(name);
        self.flags.insert(name.to_string(), value);
        value
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
