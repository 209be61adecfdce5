//! fieldtree - form state engine
//!
//! Builds a tree of fields mirroring a JSON model, tracks dirty, touched and
//! validity state per field, and drives a submit lifecycle
//! (idle, submitting, submitted or error).

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod validation;

pub use config::MessagesConfig;
pub use error::{FormError, Result};
pub use handlers::{SubmitErrorHandler, SubmitEvent, SubmitHandler};
pub use state::{Field, FieldPath, FieldShape, Form, FormOptions, SubmissionStatus};
pub use validation::{FieldValidation, Rule, Validations};
