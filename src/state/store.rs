//! Shared model storage for a field tree
//!
//! The current model and the original snapshot are held as `Rc<Value>`.
//! Writes go through `Rc::make_mut`, so a snapshot handed out earlier is
//! cloned before it would be modified and never changes under its holder.

use super::path::{FieldPath, PathSegment};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct ModelStore {
    model: RefCell<Rc<Value>>,
    original: RefCell<Rc<Value>>,
}

impl ModelStore {
    pub fn new(model: Value) -> Self {
        let model = Rc::new(model);
        Self {
            original: RefCell::new(Rc::clone(&model)),
            model: RefCell::new(model),
        }
    }

    /// Current model snapshot
    pub fn model(&self) -> Rc<Value> {
        Rc::clone(&self.model.borrow())
    }

    /// Original snapshot taken at construction or last re-initialization
    pub fn original(&self) -> Rc<Value> {
        Rc::clone(&self.original.borrow())
    }

    pub fn value_at(&self, path: &FieldPath) -> Value {
        lookup(&self.model.borrow(), path).cloned().unwrap_or(Value::Null)
    }

    pub fn original_at(&self, path: &FieldPath) -> Value {
        lookup(&self.original.borrow(), path)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set_at(&self, path: &FieldPath, value: Value) {
        let mut model = self.model.borrow_mut();
        write(Rc::make_mut(&mut model), path.segments(), value);
    }

    pub fn set_original_at(&self, path: &FieldPath, value: Value) {
        let mut original = self.original.borrow_mut();
        write(Rc::make_mut(&mut original), path.segments(), value);
    }

    /// Copy the original value at `path` back into the model
    pub fn restore_at(&self, path: &FieldPath) {
        if path.is_root() {
            self.restore();
            return;
        }
        let original = self.original_at(path);
        self.set_at(path, original);
    }

    /// Make the model equal to the original snapshot again
    pub fn restore(&self) {
        let original = self.original();
        *self.model.borrow_mut() = original;
    }

    /// Replace both model and original snapshot
    pub fn replace(&self, model: Value) {
        let model = Rc::new(model);
        *self.original.borrow_mut() = Rc::clone(&model);
        *self.model.borrow_mut() = model;
    }
}

fn lookup<'a>(value: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| match segment {
            PathSegment::Key(key) => current.get(key.as_str()),
            PathSegment::Index(index) => current.get(*index),
        })
}

/// Write `value` at `segments`, creating intermediate objects and arrays
fn write(target: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    match first {
        PathSegment::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                write(slot, rest, value);
            }
        }
        PathSegment::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                write(&mut items[*index], rest, value);
            }
        }
    }
}

/// Deep equality where a missing object key equals `null`, and numbers
/// compare by numeric value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => left
            .keys()
            .chain(right.keys())
            .all(|key| {
                values_equal(
                    left.get(key).unwrap_or(&Value::Null),
                    right.get(key).unwrap_or(&Value::Null),
                )
            }),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(l, r)| values_equal(l, r))
        }
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        _ => a == b,
    }
}
