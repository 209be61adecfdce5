//! Validation rules and the per-property validation tree

use super::builtins::Builtin;
use super::engine::ValidationContext;
use crate::error::{FormError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Own rule of a property in the JSON form
const RULE_KEY: &str = "$rule";
/// Element validation of an array property in the JSON form
const EACH_KEY: &str = "$each";

/// Custom rule function: receives the field value and whole model
pub type CustomRule = Rc<dyn Fn(&ValidationContext<'_>) -> Vec<String>>;

/// A single validation rule
#[derive(Clone)]
pub enum Rule {
    /// Named built-in (`required`, `email`, `number`, `json`, `website`)
    Builtin(Builtin),
    /// Value must match the expression
    Pattern(Regex),
    /// Caller-supplied check returning error messages
    Custom(CustomRule),
    /// Rules evaluated in order, errors concatenated
    All(Vec<Rule>),
}

impl Rule {
    /// Value must not be empty
    pub fn required() -> Self {
        Rule::Builtin(Builtin::Required)
    }

    /// Value must look like an email address
    pub fn email() -> Self {
        Rule::Builtin(Builtin::Email)
    }

    /// Value must be a finite number
    pub fn number() -> Self {
        Rule::Builtin(Builtin::Number)
    }

    /// Value must be valid JSON text
    pub fn json() -> Self {
        Rule::Builtin(Builtin::Json)
    }

    /// Value must be an http or https URL
    pub fn website() -> Self {
        Rule::Builtin(Builtin::Website)
    }

    /// Resolve a built-in rule by name
    pub fn named(name: &str) -> Result<Self> {
        Builtin::from_name(name)
            .map(Rule::Builtin)
            .ok_or_else(|| FormError::UnknownRule {
                name: name.to_string(),
            })
    }

    /// Compile a regular expression rule
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Rule::Pattern)
            .map_err(|source| FormError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Rule backed by a function of the value and the model
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&ValidationContext<'_>) -> Vec<String> + 'static,
    {
        Rule::Custom(Rc::new(check))
    }

    /// Rules evaluated in order, errors concatenated
    pub fn all(rules: impl IntoIterator<Item = Rule>) -> Self {
        Rule::All(rules.into_iter().collect())
    }

    /// Parse a rule from its JSON description.
    ///
    /// A string is a built-in name, or a pattern when written as `/expr/`.
    /// An array is a list of such rules.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => match text
                .strip_prefix('/')
                .and_then(|rest| rest.strip_suffix('/'))
            {
                Some(expr) => Rule::pattern(expr),
                None => Rule::named(text),
            },
            Value::Array(items) => items
                .iter()
                .map(Rule::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Rule::All),
            other => Err(FormError::UnknownRule {
                name: other.to_string(),
            }),
        }
    }

    /// True if this rule, or any rule in a list, is `required`
    pub fn is_required(&self) -> bool {
        match self {
            Rule::Builtin(Builtin::Required) => true,
            Rule::All(rules) => rules.iter().any(Rule::is_required),
            _ => false,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Builtin(builtin) => write!(f, "Builtin({builtin})"),
            Rule::Pattern(regex) => write!(f, "Pattern(/{}/)", regex.as_str()),
            Rule::Custom(_) => f.write_str("Custom(..)"),
            Rule::All(rules) => f.debug_tuple("All").field(rules).finish(),
        }
    }
}

impl From<Builtin> for Rule {
    fn from(builtin: Builtin) -> Self {
        Rule::Builtin(builtin)
    }
}

impl From<Regex> for Rule {
    fn from(regex: Regex) -> Self {
        Rule::Pattern(regex)
    }
}

impl From<Vec<Rule>> for Rule {
    fn from(rules: Vec<Rule>) -> Self {
        Rule::All(rules)
    }
}

/// Validation for one property: its own rule, rules for nested properties
/// (object fields) and a rule applied to each element (array fields).
#[derive(Debug, Clone, Default)]
pub struct FieldValidation {
    rule: Option<Rule>,
    fields: Validations,
    each: Option<Box<FieldValidation>>,
}

impl FieldValidation {
    /// Validation with only an own rule
    pub fn new(rule: impl Into<Rule>) -> Self {
        Self {
            rule: Some(rule.into()),
            ..Default::default()
        }
    }

    /// Validation with only nested properties
    pub fn nested(fields: Validations) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    /// Own rule of the property
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Validations of nested properties
    pub fn fields(&self) -> &Validations {
        &self.fields
    }

    /// Validation applied to every array element
    pub fn each(&self) -> Option<&FieldValidation> {
        self.each.as_deref()
    }

    /// Has validations for nested properties
    pub fn is_nested(&self) -> bool {
        !self.fields.is_empty()
    }

    /// True when the own rule includes `required`
    pub fn is_required(&self) -> bool {
        self.rule.as_ref().is_some_and(Rule::is_required)
    }

    /// Parse one property entry.
    ///
    /// A rule (see [`Rule::from_json`]) gives the own rule. An object holds
    /// nested property validations, with `$rule` for the own rule and
    /// `$each` for the element validation of an array property.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Ok(FieldValidation::new(Rule::from_json(value)?));
        };
        let mut validation = FieldValidation::default();
        for (key, entry) in map {
            match key.as_str() {
                RULE_KEY => validation.rule = Some(Rule::from_json(entry)?),
                EACH_KEY => validation.each = Some(Box::new(FieldValidation::from_json(entry)?)),
                _ => validation
                    .fields
                    .insert(key.clone(), FieldValidation::from_json(entry)?),
            }
        }
        Ok(validation)
    }
}

impl From<Rule> for FieldValidation {
    fn from(rule: Rule) -> Self {
        FieldValidation::new(rule)
    }
}

impl From<Validations> for FieldValidation {
    fn from(fields: Validations) -> Self {
        FieldValidation::nested(fields)
    }
}

/// Validations keyed by property name
#[derive(Debug, Clone, Default)]
pub struct Validations {
    entries: IndexMap<String, FieldValidation>,
}

impl Validations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule for a property, keeping any nested validations
    pub fn rule(mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.entries.entry(key.into()).or_default().rule = Some(rule.into());
        self
    }

    /// Set validations for the properties of a nested object
    pub fn nested(mut self, key: impl Into<String>, fields: Validations) -> Self {
        self.entries.entry(key.into()).or_default().fields = fields;
        self
    }

    /// Set the validation applied to each element of an array property
    pub fn each(mut self, key: impl Into<String>, each: impl Into<FieldValidation>) -> Self {
        self.entries.entry(key.into()).or_default().each = Some(Box::new(each.into()));
        self
    }

    /// Set the validation for `key`, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, validation: FieldValidation) {
        self.entries.insert(key.into(), validation);
    }

    /// Validation for `key`
    pub fn get(&self, key: &str) -> Option<&FieldValidation> {
        self.entries.get(key)
    }

    /// Validated property names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of validated properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse validations from JSON.
    ///
    /// Each property maps to an entry read by [`FieldValidation::from_json`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(FormError::ModelNotObject {
                kind: FormError::kind_of(value),
            });
        };
        let mut validations = Validations::new();
        for (key, entry) in map {
            validations.insert(key.clone(), FieldValidation::from_json(entry)?);
        }
        Ok(validations)
    }
}
