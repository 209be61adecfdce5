//! Form domain layer
//!
//! A [`Form`] owns a tree of [`Field`]s mirroring the shape of its model:
//! leaves for scalars, lazily built child sets for objects, and element
//! lists for arrays.

mod builder;
mod field;
mod form_state;

pub use builder::{build_field, FieldContext, FocusCallback};
pub use field::{Field, FieldEvent, FieldShape, Notifier};
pub use form_state::{Form, FormOptions, UpdateCallback};
