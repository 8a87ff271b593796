#![allow(missing_docs)]

pub mod controller;
pub mod message;
pub mod record;
pub mod render;
pub mod result;
pub mod spec;
pub mod validate;

pub use controller::{FormController, FormState, SubmitBlocked, SubmitOutcome};
pub use message::{MessageContext, MessageRenderer};
pub use record::Record;
pub use render::{RenderField, RenderPayload, build_render_payload, render_json_ui, render_text};
pub use result::ValidationResult;
pub use spec::{Constraint, FieldKind, FieldRule, FormSpec, SpecError};
pub use validate::{Patterns, evaluate, evaluate_with, parse_number};
