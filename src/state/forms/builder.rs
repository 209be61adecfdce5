//! Field tree construction
//!
//! The kind of a field is decided here from the shape of the value at its
//! path, and decided again whenever that shape changes. Arrays build their
//! elements eagerly; objects build their children on first access.

use super::field::{ArrayNode, Field, FieldEvent, FieldKind, FieldShape, Notifier, ObjectNode};
use crate::config::MessagesConfig;
use crate::state::path::FieldPath;
use crate::state::store::ModelStore;
use crate::validation::FieldValidation;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::ops::Range;
use std::rc::Rc;

/// Called with the field path and `true` on focus, `false` on blur
pub type FocusCallback = Rc<dyn Fn(&FieldPath, bool)>;

/// State shared by every field of one tree
pub struct FieldContext {
    pub(crate) store: ModelStore,
    pub(crate) messages: MessagesConfig,
    pub(crate) on_focus_change: Option<FocusCallback>,
}

impl FieldContext {
    pub fn new(
        model: Value,
        messages: MessagesConfig,
        on_focus_change: Option<FocusCallback>,
    ) -> Self {
        Self {
            store: ModelStore::new(model),
            messages,
            on_focus_change,
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }
}

/// Build the field for the value currently stored at `path`
pub fn build_field(
    ctx: &Rc<FieldContext>,
    path: FieldPath,
    validation: Option<FieldValidation>,
    notify_parent: Notifier,
) -> Field {
    let kind = build_kind(ctx, &path, validation.as_ref(), &notify_parent);
    Field::from_parts(path, validation, Rc::clone(ctx), notify_parent, kind)
}

/// Shape a field takes for `value`: `null` with nested validation is an
/// object still to be materialized
pub(crate) fn shape_for(value: &Value, validation: Option<&FieldValidation>) -> FieldShape {
    match value {
        Value::Array(_) => FieldShape::Array,
        Value::Object(_) => FieldShape::Object,
        Value::Null if validation.is_some_and(FieldValidation::is_nested) => FieldShape::Object,
        _ => FieldShape::Leaf,
    }
}

/// Build the kind matching the value currently stored at `path`
pub(crate) fn build_kind(
    ctx: &Rc<FieldContext>,
    path: &FieldPath,
    validation: Option<&FieldValidation>,
    notify_parent: &Notifier,
) -> FieldKind {
    let value = ctx.store.value_at(path);
    match shape_for(&value, validation) {
        FieldShape::Array => {
            let notifier = child_notifier(path, notify_parent);
            let each = validation.and_then(FieldValidation::each);
            let len = value.as_array().map_or(0, Vec::len);
            let elements = build_elements(ctx, path, each, &notifier, 0..len);
            FieldKind::Array(ArrayNode::new(elements, notifier))
        }
        FieldShape::Object => FieldKind::Object(ObjectNode::new(child_notifier(path, notify_parent))),
        FieldShape::Leaf => FieldKind::Leaf,
    }
}

/// Build element fields for the given index range of the array at `path`
pub(crate) fn build_elements(
    ctx: &Rc<FieldContext>,
    path: &FieldPath,
    each: Option<&FieldValidation>,
    notifier: &Notifier,
    range: Range<usize>,
) -> Vec<Field> {
    range
        .map(|index| build_field(ctx, path.index(index), each.cloned(), Rc::clone(notifier)))
        .collect()
}

/// Build the child fields of the object at `path`.
///
/// A `null` value is replaced by an empty object in the model, and in the
/// original snapshot when that is `null` as well, so the placeholder does
/// not count as a change. Keys named only by nested validations get a child
/// whose value is `null`.
pub(crate) fn build_children(
    ctx: &Rc<FieldContext>,
    path: &FieldPath,
    validation: Option<&FieldValidation>,
    notifier: &Notifier,
) -> IndexMap<String, Field> {
    let mut value = ctx.store.value_at(path);
    if value.is_null() {
        value = Value::Object(Map::new());
        ctx.store.set_at(path, value.clone());
        if ctx.store.original_at(path).is_null() {
            ctx.store.set_original_at(path, value.clone());
        }
        tracing::debug!(field = %path, "Materialized placeholder object");
    }

    let mut keys: Vec<String> = match &value {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    };
    if let Some(validation) = validation {
        for key in validation.fields().keys() {
            if !keys.iter().any(|existing| existing == key) {
                keys.push(key.to_string());
            }
        }
    }

    keys.into_iter()
        .map(|key| {
            let child = build_child(ctx, path, validation, notifier, &key);
            (key, child)
        })
        .collect()
}

/// Build the child field for one key of the object at `path`
pub(crate) fn build_child(
    ctx: &Rc<FieldContext>,
    path: &FieldPath,
    validation: Option<&FieldValidation>,
    notifier: &Notifier,
    key: &str,
) -> Field {
    let child_validation = validation.and_then(|v| v.fields().get(key)).cloned();
    build_field(ctx, path.key(key), child_validation, Rc::clone(notifier))
}

/// Notifier handed to the children of the field at `path`: forwards every
/// event to the field's own parent.
fn child_notifier(path: &FieldPath, notify_parent: &Notifier) -> Notifier {
    let parent = Rc::clone(notify_parent);
    let path = path.clone();
    Rc::new(move |event: &FieldEvent| {
        tracing::trace!(field = %path, ?event, "Propagating field event");
        parent(event)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::FieldShape;
    use crate::validation::{Rule, Validations};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    fn context(model: Value) -> Rc<FieldContext> {
        Rc::new(FieldContext::new(model, MessagesConfig::default(), None))
    }

    fn recorder() -> (Notifier, Rc<RefCell<Vec<FieldEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let notifier: Notifier = Rc::new(move |event: &FieldEvent| sink.borrow_mut().push(event.clone()));
        (notifier, events)
    }

    #[test]
    fn test_scalar_builds_leaf() {
        let ctx = context(json!({"name": "x", "age": 3, "ok": true, "none": null}));
        let (notifier, _) = recorder();
        for key in ["name", "age", "ok", "none"] {
            let field = build_field(&ctx, FieldPath::parse(key), None, Rc::clone(&notifier));
            assert_eq!(field.shape(), FieldShape::Leaf);
        }
    }

    #[test]
    fn test_array_builds_elements_eagerly() {
        let ctx = context(json!({"emails": ["a", "b", "c"]}));
        let (notifier, _) = recorder();
        let field = build_field(&ctx, FieldPath::parse("emails"), None, notifier);
        assert_eq!(field.shape(), FieldShape::Array);
        assert_eq!(field.elements().len(), 3);
        assert_eq!(field.elements()[2].path().to_string(), "emails.2");
    }

    #[test]
    fn test_null_with_nested_validation_builds_object() {
        let ctx = context(json!({}));
        let (notifier, _) = recorder();
        let validation = FieldValidation::nested(Validations::new().rule("streetName", Rule::required()));
        let field = build_field(&ctx, FieldPath::parse("address"), Some(validation), notifier);
        assert_eq!(field.shape(), FieldShape::Object);
        // Not materialized yet
        assert_eq!(*ctx.store.model(), json!({}));
    }

    #[test]
    fn test_children_materialize_placeholder_in_model_and_original() {
        let ctx = context(json!({"address": null}));
        let (notifier, _) = recorder();
        let validation = FieldValidation::nested(Validations::new().rule("streetName", Rule::required()));
        let children = build_children(&ctx, &FieldPath::parse("address"), Some(&validation), &notifier);

        assert_eq!(children.keys().collect::<Vec<_>>(), vec!["streetName"]);
        assert_eq!(*ctx.store.model(), json!({"address": {}}));
        assert_eq!(*ctx.store.original(), json!({"address": {}}));
    }

    #[test]
    fn test_children_union_value_and_validation_keys() {
        let ctx = context(json!({"address": {"city": "Graz"}}));
        let (notifier, _) = recorder();
        let validation = FieldValidation::nested(Validations::new().rule("zip", Rule::required()));
        let children = build_children(&ctx, &FieldPath::parse("address"), Some(&validation), &notifier);

        assert_eq!(children.keys().collect::<Vec<_>>(), vec!["city", "zip"]);
        assert_eq!(children["zip"].value(), Value::Null);
        assert_eq!(*ctx.store.model(), json!({"address": {"city": "Graz"}}));
    }

    #[test]
    fn test_shape_for_follows_value_and_nesting() {
        let nested = FieldValidation::nested(Validations::new().rule("zip", Rule::required()));
        assert_eq!(shape_for(&json!([1]), None), FieldShape::Array);
        assert_eq!(shape_for(&json!({}), None), FieldShape::Object);
        assert_eq!(shape_for(&Value::Null, None), FieldShape::Leaf);
        assert_eq!(shape_for(&Value::Null, Some(&nested)), FieldShape::Object);
        assert_eq!(shape_for(&json!("x"), Some(&nested)), FieldShape::Leaf);
    }

    #[test]
    fn test_child_events_reach_parent_notifier() {
        let ctx = context(json!({"address": {"city": "Graz"}}));
        let (notifier, events) = recorder();
        let mut field = build_field(&ctx, FieldPath::parse("address"), None, notifier);
        field.field_mut("city").unwrap().on_change("Wien");

        assert_eq!(
            *events.borrow(),
            vec![FieldEvent::Changed(FieldPath::parse("address.city"))]
        );
    }
}
