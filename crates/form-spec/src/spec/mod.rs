pub mod field;
pub mod form;

pub use field::{Constraint, FieldKind, FieldRule};
pub use form::{FormSpec, SpecError};
