//! Submission status of a form

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a form is in its submit lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Error,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Error => "error",
        }
    }

    /// A settled submission goes back to idle on the next change
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Submitted | Self::Error)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
