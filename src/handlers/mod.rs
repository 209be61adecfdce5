//! Submit and error handler abstractions

mod traits;

pub use traits::{SubmitErrorHandler, SubmitEvent, SubmitHandler};

#[cfg(test)]
pub use traits::{MockSubmitErrorHandler, MockSubmitEvent, MockSubmitHandler};
