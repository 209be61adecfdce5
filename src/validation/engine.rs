//! Rule evaluation

use super::builtins::is_empty;
use super::rule::Rule;
use crate::config::MessagesConfig;
use serde_json::Value;

/// What a rule sees: the field's value and the whole model
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub value: &'a Value,
    pub model: &'a Value,
}

/// Evaluate a rule with the default messages
pub fn evaluate(rule: &Rule, value: &Value, model: &Value) -> Vec<String> {
    evaluate_with(
        rule,
        &ValidationContext { value, model },
        &MessagesConfig::default(),
    )
}

/// Evaluate a rule, returning error messages in rule order.
///
/// Fields without a `required` rule are not checked while empty.
pub fn evaluate_with(
    rule: &Rule,
    ctx: &ValidationContext<'_>,
    messages: &MessagesConfig,
) -> Vec<String> {
    if !rule.is_required() && is_empty(ctx.value) {
        return Vec::new();
    }
    let mut errors = Vec::new();
    collect(rule, ctx, messages, &mut errors);
    errors
}

fn collect(
    rule: &Rule,
    ctx: &ValidationContext<'_>,
    messages: &MessagesConfig,
    errors: &mut Vec<String>,
) {
    match rule {
        Rule::Builtin(builtin) => {
            if !builtin.check(ctx.value) {
                errors.push(builtin.message(messages));
            }
        }
        Rule::Pattern(regex) => {
            if !regex.is_match(&text_of(ctx.value)) {
                errors.push(messages.pattern().to_string());
            }
        }
        Rule::Custom(check) => errors.extend(check(ctx)),
        Rule::All(rules) => {
            for rule in rules {
                collect(rule, ctx, messages, errors);
            }
        }
    }
}

/// Textual form of a value for pattern matching
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
