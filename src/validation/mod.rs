//! Validation engine
//!
//! Rules are evaluated against a field's value and the whole model,
//! producing an ordered list of error messages. Evaluation is pure.

mod builtins;
mod engine;
mod rule;

pub use builtins::{is_empty, Builtin};
pub use engine::{evaluate, evaluate_with, ValidationContext};
pub use rule::{CustomRule, FieldValidation, Rule, Validations};
