//! Field tree nodes
//!
//! A [`Field`] tracks one property of the model: its value (read from the
//! shared model store at the field's path), touched state, validation and,
//! for objects and arrays, its child fields. Parents own their children;
//! children only hold a notifier callback leading back up the tree.

use super::builder::{
    build_child, build_children, build_elements, build_kind, shape_for, FieldContext,
};
use crate::error::{FormError, Result};
use crate::state::path::{FieldPath, PathSegment};
use crate::state::store::values_equal;
use crate::validation::{evaluate_with, FieldValidation, ValidationContext};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Something happened to the field at the given path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The value changed (including resets)
    Changed(FieldPath),
    /// The field was touched or blurred
    Touched(FieldPath),
}

impl FieldEvent {
    /// Path of the field the event came from
    pub fn path(&self) -> &FieldPath {
        match self {
            FieldEvent::Changed(path) | FieldEvent::Touched(path) => path,
        }
    }
}

/// Upward link from a field to its parent
pub type Notifier = Rc<dyn Fn(&FieldEvent)>;

/// Shape of a field, following the shape of its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Leaf,
    Object,
    Array,
}

pub(crate) enum FieldKind {
    Leaf,
    Object(ObjectNode),
    Array(ArrayNode),
}

/// Children of an object field, built on first access
pub(crate) struct ObjectNode {
    children: OnceCell<IndexMap<String, Field>>,
    notifier: Notifier,
}

impl ObjectNode {
    pub(crate) fn new(notifier: Notifier) -> Self {
        Self {
            children: OnceCell::new(),
            notifier,
        }
    }

    fn children(
        &self,
        ctx: &Rc<FieldContext>,
        path: &FieldPath,
        validation: Option<&FieldValidation>,
    ) -> &IndexMap<String, Field> {
        self.children
            .get_or_init(|| build_children(ctx, path, validation, &self.notifier))
    }

    fn children_mut(
        &mut self,
        ctx: &Rc<FieldContext>,
        path: &FieldPath,
        validation: Option<&FieldValidation>,
    ) -> &mut IndexMap<String, Field> {
        if self.children.get().is_none() {
            let built = build_children(ctx, path, validation, &self.notifier);
            self.children = OnceCell::from(built);
        }
        match self.children.get_mut() {
            Some(children) => children,
            None => unreachable!("object children are materialized above"),
        }
    }

    /// Add children for keys that appeared in the value since materializing
    fn add_missing(
        &mut self,
        ctx: &Rc<FieldContext>,
        path: &FieldPath,
        validation: Option<&FieldValidation>,
    ) {
        let notifier = Rc::clone(&self.notifier);
        let Some(children) = self.children.get_mut() else {
            return;
        };
        if let Value::Object(map) = ctx.store.value_at(path) {
            for key in map.keys() {
                if !children.contains_key(key) {
                    let child = build_child(ctx, path, validation, &notifier, key);
                    children.insert(key.clone(), child);
                }
            }
        }
    }
}

/// Element fields of an array field, one per element
pub(crate) struct ArrayNode {
    elements: Vec<Field>,
    notifier: Notifier,
}

impl ArrayNode {
    pub(crate) fn new(elements: Vec<Field>, notifier: Notifier) -> Self {
        Self { elements, notifier }
    }

    /// Match the element fields to the stored array: keep existing fields
    /// where the length allows, build new ones for added slots and drop
    /// trailing ones for removed slots.
    fn sync(
        &mut self,
        ctx: &Rc<FieldContext>,
        path: &FieldPath,
        validation: Option<&FieldValidation>,
    ) {
        let len = ctx.store.value_at(path).as_array().map_or(0, Vec::len);
        self.elements.truncate(len);
        for element in &mut self.elements {
            element.resync();
        }
        let current = self.elements.len();
        if len > current {
            let each = validation.and_then(FieldValidation::each);
            self.elements
                .extend(build_elements(ctx, path, each, &self.notifier, current..len));
        }
    }

    fn rebuild(
        &mut self,
        ctx: &Rc<FieldContext>,
        path: &FieldPath,
        validation: Option<&FieldValidation>,
    ) {
        let len = ctx.store.value_at(path).as_array().map_or(0, Vec::len);
        let each = validation.and_then(FieldValidation::each);
        self.elements = build_elements(ctx, path, each, &self.notifier, 0..len);
    }
}

/// One node of the field tree
pub struct Field {
    path: FieldPath,
    touched: bool,
    validation: Option<FieldValidation>,
    ctx: Rc<FieldContext>,
    notify_parent: Notifier,
    kind: FieldKind,
}

impl Field {
    pub(crate) fn from_parts(
        path: FieldPath,
        validation: Option<FieldValidation>,
        ctx: Rc<FieldContext>,
        notify_parent: Notifier,
        kind: FieldKind,
    ) -> Self {
        Self {
            path,
            touched: false,
            validation,
            ctx,
            notify_parent,
            kind,
        }
    }

    /// Location of this field in the model
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Property name or element index of this field
    pub fn name(&self) -> String {
        self.path
            .last()
            .map(PathSegment::to_string)
            .unwrap_or_default()
    }

    /// Whether this is a leaf, object or array field
    pub fn shape(&self) -> FieldShape {
        match self.kind {
            FieldKind::Leaf => FieldShape::Leaf,
            FieldKind::Object(_) => FieldShape::Object,
            FieldKind::Array(_) => FieldShape::Array,
        }
    }

    /// Current value, read from the model
    pub fn value(&self) -> Value {
        self.ctx.store.value_at(&self.path)
    }

    /// Value at this path in the original snapshot
    pub fn original_value(&self) -> Value {
        self.ctx.store.original_at(&self.path)
    }

    /// True when the value differs from the original value
    pub fn dirty(&self) -> bool {
        let original = self.original_value();
        if let FieldKind::Array(node) = &self.kind {
            let original_len = original.as_array().map_or(0, Vec::len);
            if node.elements.len() != original_len {
                return true;
            }
        }
        !values_equal(&self.value(), &original)
    }

    /// True after blur, touch or a submit attempt
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// True when the own rule includes `required`
    pub fn required(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(FieldValidation::is_required)
    }

    /// Validation attached to this field
    pub fn validation(&self) -> Option<&FieldValidation> {
        self.validation.as_ref()
    }

    /// Error messages for this field's own rule, evaluated on each call
    pub fn errors(&self) -> Vec<String> {
        let Some(rule) = self.validation.as_ref().and_then(FieldValidation::rule) else {
            return Vec::new();
        };
        let value = self.value();
        let model = self.ctx.store.model();
        let ctx = ValidationContext {
            value: &value,
            model: &model,
        };
        evaluate_with(rule, &ctx, &self.ctx.messages)
    }

    /// No own errors, and every descendant is valid
    pub fn valid(&self) -> bool {
        if !self.errors().is_empty() {
            return false;
        }
        match &self.kind {
            FieldKind::Leaf => true,
            FieldKind::Object(node) => node
                .children(&self.ctx, &self.path, self.validation.as_ref())
                .values()
                .all(Field::valid),
            FieldKind::Array(node) => node.elements.iter().all(Field::valid),
        }
    }

    /// Set a new value and notify the parent.
    ///
    /// Object fields shallow-merge an object into their value, forwarding
    /// each key to the matching child. Array fields replace the whole array.
    pub fn on_change(&mut self, value: impl Into<Value>) {
        self.apply(value.into());
        self.emit(FieldEvent::Changed(self.path.clone()));
    }

    /// Set a new value without notifying
    pub(crate) fn apply(&mut self, value: Value) {
        let value = match value {
            Value::Object(partial) if matches!(self.kind, FieldKind::Object(_)) => {
                self.merge(partial);
                return;
            }
            other => other,
        };
        self.ctx.store.set_at(&self.path, value);
        if let FieldKind::Object(node) = &mut self.kind {
            node.children = OnceCell::new();
        }
        self.resync();
    }

    /// Forward each key of `partial` to the matching child of an object field
    fn merge(&mut self, partial: Map<String, Value>) {
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        let FieldKind::Object(node) = kind else {
            return;
        };
        let notifier = Rc::clone(&node.notifier);
        let children = node.children_mut(ctx, path, validation.as_ref());
        for (key, child_value) in partial {
            match children.get_mut(&key) {
                Some(child) => child.apply(child_value),
                None => {
                    ctx.store.set_at(&path.key(key.as_str()), child_value);
                    let child = build_child(ctx, path, validation.as_ref(), &notifier, &key);
                    children.insert(key, child);
                }
            }
        }
    }

    /// Rebuild the kind when the stored value no longer has this field's
    /// shape. Returns whether the kind was rebuilt.
    fn reshape(&mut self) -> bool {
        let wanted = shape_for(&self.value(), self.validation.as_ref());
        if wanted == self.shape() {
            return false;
        }
        tracing::debug!(field = %self.path, from = ?self.shape(), to = ?wanted, "Field changed shape");
        self.kind = build_kind(
            &self.ctx,
            &self.path,
            self.validation.as_ref(),
            &self.notify_parent,
        );
        true
    }

    /// Bring child structure in line with the stored value
    pub(crate) fn resync(&mut self) {
        if self.reshape() {
            return;
        }
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        match kind {
            FieldKind::Leaf => {}
            FieldKind::Array(node) => node.sync(ctx, path, validation.as_ref()),
            FieldKind::Object(node) => {
                node.add_missing(ctx, path, validation.as_ref());
                if let Some(children) = node.children.get_mut() {
                    for child in children.values_mut() {
                        child.resync();
                    }
                }
            }
        }
    }

    /// Report focus; changes no state
    pub fn on_focus(&self) {
        if let Some(callback) = &self.ctx.on_focus_change {
            callback(&self.path, true);
        }
    }

    /// Mark the field as touched and notify the parent
    pub fn on_blur(&mut self) {
        self.touched = true;
        if let Some(callback) = &self.ctx.on_focus_change {
            callback(&self.path, false);
        }
        self.emit(FieldEvent::Touched(self.path.clone()));
    }

    /// Mark this field and every descendant as touched
    pub fn touch(&mut self) {
        self.touch_silent();
        self.emit(FieldEvent::Touched(self.path.clone()));
    }

    pub(crate) fn touch_silent(&mut self) {
        self.touched = true;
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        match kind {
            FieldKind::Leaf => {}
            FieldKind::Object(node) => {
                for child in node.children_mut(ctx, path, validation.as_ref()).values_mut() {
                    child.touch_silent();
                }
            }
            FieldKind::Array(node) => {
                for element in &mut node.elements {
                    element.touch_silent();
                }
            }
        }
    }

    /// Restore the original value of this subtree and clear touched state
    pub fn reset(&mut self) {
        self.reset_silent();
        self.emit(FieldEvent::Changed(self.path.clone()));
    }

    pub(crate) fn reset_silent(&mut self) {
        self.ctx.store.restore_at(&self.path);
        self.clear_state();
    }

    /// Clear touched flags and resync structure after a restore
    pub(crate) fn clear_state(&mut self) {
        self.touched = false;
        if self.reshape() {
            return;
        }
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        match kind {
            FieldKind::Leaf => {}
            FieldKind::Array(node) => {
                node.sync(ctx, path, validation.as_ref());
                for element in &mut node.elements {
                    element.clear_state();
                }
            }
            FieldKind::Object(node) => {
                node.add_missing(ctx, path, validation.as_ref());
                if let Some(children) = node.children.get_mut() {
                    for child in children.values_mut() {
                        child.clear_state();
                    }
                }
            }
        }
    }

    /// Child fields of an object field, materialized on first access
    pub fn fields(&self) -> Option<&IndexMap<String, Field>> {
        match &self.kind {
            FieldKind::Object(node) => {
                Some(node.children(&self.ctx, &self.path, self.validation.as_ref()))
            }
            _ => None,
        }
    }

    /// Child field of an object field
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields().and_then(|fields| fields.get(key))
    }

    /// Child field of an object field; a child is created for keys the
    /// value does not have yet
    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        let FieldKind::Object(node) = kind else {
            return None;
        };
        let notifier = Rc::clone(&node.notifier);
        let children = node.children_mut(ctx, path, validation.as_ref());
        if !children.contains_key(key) {
            let child = build_child(ctx, path, validation.as_ref(), &notifier, key);
            children.insert(key.to_string(), child);
        }
        children.get_mut(key)
    }

    /// Element fields of an array field; empty for other shapes
    pub fn elements(&self) -> &[Field] {
        match &self.kind {
            FieldKind::Array(node) => &node.elements,
            _ => &[],
        }
    }

    /// Mutable element fields of an array field
    pub fn elements_mut(&mut self) -> &mut [Field] {
        match &mut self.kind {
            FieldKind::Array(node) => &mut node.elements,
            _ => &mut [],
        }
    }

    /// Element field at `index`
    pub fn element(&self, index: usize) -> Option<&Field> {
        self.elements().get(index)
    }

    /// Mutable element field at `index`
    pub fn element_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.elements_mut().get_mut(index)
    }

    /// Append an element to an array field
    pub fn add(&mut self, value: impl Into<Value>) -> Result<()> {
        let mut items = self.array_items()?;
        items.push(value.into());
        self.replace_elements(items);
        Ok(())
    }

    /// Remove the element at `index` from an array field, returning its value
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        let mut items = self.array_items()?;
        if index >= items.len() {
            return Err(FormError::IndexOutOfRange {
                path: self.path.to_string(),
                index,
                len: items.len(),
            });
        }
        let removed = items.remove(index);
        self.replace_elements(items);
        Ok(removed)
    }

    fn array_items(&self) -> Result<Vec<Value>> {
        if !matches!(self.kind, FieldKind::Array(_)) {
            return Err(FormError::NotAnArray {
                path: self.path.to_string(),
            });
        }
        Ok(self.value().as_array().cloned().unwrap_or_default())
    }

    fn replace_elements(&mut self, items: Vec<Value>) {
        let Field {
            path,
            ctx,
            validation,
            kind,
            ..
        } = self;
        ctx.store.set_at(path, Value::Array(items));
        if let FieldKind::Array(node) = kind {
            node.rebuild(ctx, path, validation.as_ref());
        }
        self.emit(FieldEvent::Changed(self.path.clone()));
    }

    /// Descendant at a path relative to this field
    pub fn find(&self, path: &FieldPath) -> Option<&Field> {
        path.segments()
            .iter()
            .try_fold(self, |current, segment| match segment {
                PathSegment::Key(key) => current.field(key),
                PathSegment::Index(index) => current.element(*index),
            })
    }

    /// Mutable descendant at a relative path, creating object children on demand
    pub fn find_mut(&mut self, path: &FieldPath) -> Option<&mut Field> {
        self.find_segments_mut(path.segments())
    }

    fn find_segments_mut(&mut self, segments: &[PathSegment]) -> Option<&mut Field> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        let next = match first {
            PathSegment::Key(key) => self.field_mut(key)?,
            PathSegment::Index(index) => self.element_mut(*index)?,
        };
        next.find_segments_mut(rest)
    }

    /// Call `visit` on this field and every descendant, depth first
    pub fn walk(&self, visit: &mut dyn FnMut(&Field)) {
        visit(self);
        match &self.kind {
            FieldKind::Leaf => {}
            FieldKind::Object(node) => {
                for child in node
                    .children(&self.ctx, &self.path, self.validation.as_ref())
                    .values()
                {
                    child.walk(visit);
                }
            }
            FieldKind::Array(node) => {
                for element in &node.elements {
                    element.walk(visit);
                }
            }
        }
    }

    /// Replace this subtree's validations
    pub(crate) fn set_validation(&mut self, validation: Option<FieldValidation>) {
        self.validation = validation;
        if self.reshape() {
            return;
        }
        let Field {
            validation, kind, ..
        } = self;
        match kind {
            FieldKind::Leaf => {}
            FieldKind::Object(node) => {
                if let Some(children) = node.children.get_mut() {
                    for (key, child) in children.iter_mut() {
                        let nested = validation.as_ref().and_then(|v| v.fields().get(key)).cloned();
                        child.set_validation(nested);
                    }
                }
            }
            FieldKind::Array(node) => {
                let each = validation.as_ref().and_then(FieldValidation::each);
                for element in &mut node.elements {
                    element.set_validation(each.cloned());
                }
            }
        }
    }

    fn emit(&self, event: FieldEvent) {
        (self.notify_parent)(&event);
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path.to_string())
            .field("shape", &self.shape())
            .field("value", &self.value())
            .field("touched", &self.touched)
            .field("validation", &self.validation)
            .finish()
    }
}
