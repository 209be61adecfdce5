//! Form state module

mod forms;
mod path;
mod store;
mod submission;

pub use forms::*;
pub use path::*;
pub use store::*;
pub use submission::*;
