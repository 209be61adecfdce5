//! Configuration for built-in validation messages

use crate::error::{FormError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a messages config file
pub const MESSAGES_ENV: &str = "FIELDTREE_MESSAGES";

const DEFAULT_REQUIRED: &str = "This field is required";
const DEFAULT_EMAIL: &str = "Please enter a valid email address";
const DEFAULT_NUMBER: &str = "Please enter a number";
const DEFAULT_JSON: &str = "Please enter valid JSON";
const DEFAULT_WEBSITE: &str = "Please enter a valid website URL";
const DEFAULT_PATTERN: &str = "Invalid format";

/// Overrides for the messages produced by built-in rules
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MessagesConfig {
    /// Message for `required`
    pub required: Option<String>,
    /// Message for `email`
    pub email: Option<String>,
    /// Message for `number`
    pub number: Option<String>,
    /// Message for `json`
    pub json: Option<String>,
    /// Message for `website`
    pub website: Option<String>,
    /// Message for regex pattern rules
    pub pattern: Option<String>,
}

impl MessagesConfig {
    /// Load overrides from a JSON file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| FormError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MessagesConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded validation messages from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `FIELDTREE_MESSAGES`, if set
    pub fn from_env() -> Result<Self> {
        match std::env::var(MESSAGES_ENV) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn required(&self) -> &str {
        self.required.as_deref().unwrap_or(DEFAULT_REQUIRED)
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_EMAIL)
    }

    pub fn number(&self) -> &str {
        self.number.as_deref().unwrap_or(DEFAULT_NUMBER)
    }

    pub fn json(&self) -> &str {
        self.json.as_deref().unwrap_or(DEFAULT_JSON)
    }

    pub fn website(&self) -> &str {
        self.website.as_deref().unwrap_or(DEFAULT_WEBSITE)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }
}
