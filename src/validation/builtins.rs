//! Built-in validation rules
//!
//! The set of built-ins is a fixed lookup table from rule name to check.
//! Checks are pure functions over a JSON value.

use crate::config::MessagesConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("email regex is valid")
});

/// A named built-in rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Required,
    Email,
    Number,
    Json,
    Website,
}

static BUILTINS: &[(&str, Builtin)] = &[
    ("required", Builtin::Required),
    ("email", Builtin::Email),
    ("number", Builtin::Number),
    ("json", Builtin::Json),
    ("website", Builtin::Website),
];

impl Builtin {
    /// Look up a built-in by its name
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, builtin)| *builtin)
    }

    /// All built-in rule names, in table order
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|(name, _)| *name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Required => "required",
            Builtin::Email => "email",
            Builtin::Number => "number",
            Builtin::Json => "json",
            Builtin::Website => "website",
        }
    }

    /// Returns true if the value passes this rule
    pub fn check(self, value: &Value) -> bool {
        match self {
            Builtin::Required => !is_empty(value),
            Builtin::Email => format_check(value, |s| EMAIL_RE.is_match(s)),
            Builtin::Number => match value {
                Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
                // Text input holding a number
                Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
                _ => false,
            },
            Builtin::Json => match value {
                Value::String(s) => s.is_empty() || serde_json::from_str::<Value>(s).is_ok(),
                // Already structured data
                _ => true,
            },
            Builtin::Website => format_check(value, is_website),
        }
    }

    /// Message reported when the rule fails
    pub fn message(self, messages: &MessagesConfig) -> String {
        match self {
            Builtin::Required => messages.required(),
            Builtin::Email => messages.email(),
            Builtin::Number => messages.number(),
            Builtin::Json => messages.json(),
            Builtin::Website => messages.website(),
        }
        .to_string()
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value counts as empty when it is null, an empty string, or an empty array
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Format rules only judge non-empty strings; other non-empty values fail.
fn format_check(value: &Value, check: impl Fn(&str) -> bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || check(s),
        _ => false,
    }
}

fn is_website(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| host.contains('.'))
        }
        Err(_) => false,
    }
}
