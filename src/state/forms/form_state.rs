//! Form: root of a field tree and its submit lifecycle

use super::builder::{build_field, FieldContext, FocusCallback};
use super::field::{Field, FieldEvent, Notifier};
use crate::config::MessagesConfig;
use crate::error::{FormError, Result};
use crate::handlers::{SubmitErrorHandler, SubmitEvent, SubmitHandler};
use crate::state::path::{FieldPath, PathSegment};
use crate::state::submission::SubmissionStatus;
use crate::validation::Validations;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Called after every committed change or touch in the tree
pub type UpdateCallback = Rc<dyn Fn()>;

/// Collaborators and settings for a new [`Form`]
#[derive(Default)]
pub struct FormOptions {
    on_update: Option<UpdateCallback>,
    on_submit: Option<Rc<dyn SubmitHandler>>,
    on_submit_error: Option<Rc<dyn SubmitErrorHandler>>,
    on_focus_change: Option<FocusCallback>,
    validations: Validations,
    messages: MessagesConfig,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every change, touch and status change
    pub fn on_update(mut self, on_update: impl Fn() + 'static) -> Self {
        self.on_update = Some(Rc::new(on_update));
        self
    }

    /// Handler receiving a valid form on submit
    pub fn on_submit(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.on_submit = Some(Rc::new(handler));
        self
    }

    /// Handler notified when the submit handler fails
    pub fn on_submit_error(mut self, handler: impl SubmitErrorHandler + 'static) -> Self {
        self.on_submit_error = Some(Rc::new(handler));
        self
    }

    /// Called on field focus and blur
    pub fn on_focus_change(mut self, callback: impl Fn(&FieldPath, bool) + 'static) -> Self {
        self.on_focus_change = Some(Rc::new(callback));
        self
    }

    /// Validations keyed by top-level property
    pub fn validations(mut self, validations: Validations) -> Self {
        self.validations = validations;
        self
    }

    /// Messages used by the built-in rules
    pub fn messages(mut self, messages: MessagesConfig) -> Self {
        self.messages = messages;
        self
    }
}

/// Root of a field tree.
///
/// Owns one [`Field`] per top-level property, the submission status and the
/// last submission error. The model itself is never edited directly: every
/// change goes through a field or [`Form::update_fields`].
pub struct Form {
    ctx: Rc<FieldContext>,
    fields: IndexMap<String, Field>,
    validations: Validations,
    status: Rc<Cell<SubmissionStatus>>,
    error: Option<anyhow::Error>,
    on_update: Option<UpdateCallback>,
    on_submit: Option<Rc<dyn SubmitHandler>>,
    on_submit_error: Option<Rc<dyn SubmitErrorHandler>>,
    notifier: Notifier,
}

impl Form {
    /// Build a form over a JSON object model
    pub fn new(model: Value, options: FormOptions) -> Result<Self> {
        if !model.is_object() {
            return Err(FormError::ModelNotObject {
                kind: FormError::kind_of(&model),
            });
        }
        let FormOptions {
            on_update,
            on_submit,
            on_submit_error,
            on_focus_change,
            validations,
            messages,
        } = options;

        let ctx = Rc::new(FieldContext::new(model, messages, on_focus_change));
        let status = Rc::new(Cell::new(SubmissionStatus::Idle));
        let notifier = root_notifier(&status, on_update.clone());
        let fields = build_root_fields(&ctx, &validations, &notifier);
        tracing::debug!(fields = fields.len(), "Built form");

        Ok(Self {
            ctx,
            fields,
            validations,
            status,
            error: None,
            on_update,
            on_submit,
            on_submit_error,
            notifier,
        })
    }

    /// Build a form over any serializable model
    pub fn from_model<T: Serialize>(model: &T, options: FormOptions) -> Result<Self> {
        Self::new(serde_json::to_value(model)?, options)
    }

    /// Current model snapshot; later changes do not affect it
    pub fn model(&self) -> Rc<Value> {
        self.ctx.store.model()
    }

    /// Snapshot taken at construction or [`Form::reset_with`]
    pub fn original_model(&self) -> Rc<Value> {
        self.ctx.store.original()
    }

    /// Deserialize the current model
    pub fn model_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.model().as_ref().clone())?)
    }

    /// Top-level fields in model order
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Top-level field for `key`
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Mutable top-level field for `key`
    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.get_mut(key)
    }

    /// Field at a dotted path such as `address.streetName` or `emails.0`
    pub fn find(&self, path: &str) -> Option<&Field> {
        let path = FieldPath::parse(path);
        let (first, rest) = path.segments().split_first()?;
        let PathSegment::Key(key) = first else {
            return None;
        };
        let mut current = self.fields.get(key)?;
        for segment in rest {
            current = match segment {
                PathSegment::Key(key) => current.field(key)?,
                PathSegment::Index(index) => current.element(*index)?,
            };
        }
        Some(current)
    }

    /// Mutable field at a dotted path
    pub fn find_mut(&mut self, path: &str) -> Result<&mut Field> {
        let parsed = FieldPath::parse(path);
        let not_found = || FormError::FieldNotFound {
            path: path.to_string(),
        };
        let (first, rest) = parsed.segments().split_first().ok_or_else(not_found)?;
        let PathSegment::Key(key) = first else {
            return Err(not_found());
        };
        let relative = rest
            .iter()
            .fold(FieldPath::root(), |acc, segment| match segment {
                PathSegment::Key(key) => acc.key(key.as_str()),
                PathSegment::Index(index) => acc.index(*index),
            });
        self.fields
            .get_mut(key)
            .and_then(|field| field.find_mut(&relative))
            .ok_or_else(not_found)
    }

    /// New values of the dirty top-level properties
    pub fn changes(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(_, field)| field.dirty())
            .map(|(key, field)| (key.clone(), field.value()))
            .collect()
    }

    /// True when any field differs from the original model
    pub fn dirty(&self) -> bool {
        self.fields.values().any(Field::dirty)
    }

    /// True when every field in the tree passes its rules
    pub fn valid(&self) -> bool {
        self.fields.values().all(Field::valid)
    }

    /// Error messages of every failing field, keyed by dotted path
    pub fn errors(&self) -> IndexMap<String, Vec<String>> {
        let mut errors = IndexMap::new();
        for field in self.fields.values() {
            field.walk(&mut |node| {
                let messages = node.errors();
                if !messages.is_empty() {
                    errors.insert(node.path().to_string(), messages);
                }
            });
        }
        errors
    }

    /// Current submit lifecycle status
    pub fn submission_status(&self) -> SubmissionStatus {
        self.status.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.status.get() == SubmissionStatus::Submitting
    }

    /// Error from the last failed submission, kept until [`Form::reset_error`]
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    pub fn validations(&self) -> &Validations {
        &self.validations
    }

    /// Swap the submit handler
    pub fn set_on_submit(&mut self, handler: impl SubmitHandler + 'static) {
        self.on_submit = Some(Rc::new(handler));
    }

    /// Swap the submit error handler
    pub fn set_on_submit_error(&mut self, handler: impl SubmitErrorHandler + 'static) {
        self.on_submit_error = Some(Rc::new(handler));
    }

    /// Touch every field, then hand a valid form to the submit handler.
    ///
    /// An invalid form is not submitted and the status is left unchanged.
    /// Handler failures never escape: they are stored in [`Form::error`],
    /// move the status to `Error` and are passed to the error handler.
    pub async fn submit(&mut self, event: Option<&mut dyn SubmitEvent>) {
        if let Some(event) = event {
            event.prevent_default();
        }
        if self.is_submitting() {
            tracing::warn!("Submit ignored, a submission is already in flight");
            return;
        }

        self.touch_silent();
        self.emit_update();
        if !self.valid() {
            tracing::debug!(
                invalid_fields = self.errors().len(),
                "Submit dropped, form is invalid"
            );
            return;
        }

        self.set_status(SubmissionStatus::Submitting);
        let result = match self.on_submit.clone() {
            Some(handler) => handler.submit(self).await,
            None => Ok(()),
        };

        match result {
            Ok(()) => self.set_status(SubmissionStatus::Submitted),
            Err(error) => {
                tracing::warn!("Submit handler failed: {error:#}");
                self.error = Some(error);
                self.set_status(SubmissionStatus::Error);
                if let (Some(handler), Some(error)) =
                    (self.on_submit_error.clone(), self.error.as_ref())
                {
                    handler.on_submit_error(error);
                }
            }
        }
    }

    /// Forward each key of `partial` to the matching field's `on_change`.
    ///
    /// Keys without a field get one built from the new value. Each key
    /// notifies separately.
    pub fn update_fields(&mut self, partial: Value) -> Result<()> {
        let Value::Object(partial) = partial else {
            return Err(FormError::ModelNotObject {
                kind: FormError::kind_of(&partial),
            });
        };
        for (key, value) in partial {
            match self.fields.get_mut(&key) {
                Some(field) => field.on_change(value),
                None => {
                    let path = FieldPath::root().key(key.as_str());
                    self.ctx.store.set_at(&path, value);
                    let field = build_field(
                        &self.ctx,
                        path.clone(),
                        self.validations.get(&key).cloned(),
                        Rc::clone(&self.notifier),
                    );
                    self.fields.insert(key, field);
                    (self.notifier)(&FieldEvent::Changed(path));
                }
            }
        }
        Ok(())
    }

    /// Restore every field to its original value and clear touched state.
    /// The status returns to idle; the last error is kept.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.reset_silent();
        }
        self.ctx.store.restore();
        self.status.set(SubmissionStatus::Idle);
        tracing::debug!("Form reset");
        self.emit_update();
    }

    /// Start over from a new model, replacing the original snapshot and
    /// rebuilding the field tree
    pub fn reset_with(&mut self, model: Value) -> Result<()> {
        if !model.is_object() {
            return Err(FormError::ModelNotObject {
                kind: FormError::kind_of(&model),
            });
        }
        self.ctx.store.replace(model);
        self.fields = build_root_fields(&self.ctx, &self.validations, &self.notifier);
        self.status.set(SubmissionStatus::Idle);
        tracing::debug!(fields = self.fields.len(), "Form re-initialized");
        self.emit_update();
        Ok(())
    }

    /// Clear the last error and return to idle
    pub fn reset_error(&mut self) {
        self.error = None;
        self.status.set(SubmissionStatus::Idle);
        self.emit_update();
    }

    /// Run a validation pass over the whole tree
    pub fn validate(&self) -> bool {
        let errors = self.errors();
        let valid = self.valid();
        tracing::debug!(valid, invalid_fields = errors.len(), "Validated form");
        valid
    }

    /// Replace the validations of every field
    pub fn set_validations(&mut self, validations: Validations) {
        for (key, field) in self.fields.iter_mut() {
            field.set_validation(validations.get(key).cloned());
        }
        for key in validations.keys() {
            if !self.fields.contains_key(key) {
                let field = build_field(
                    &self.ctx,
                    FieldPath::root().key(key),
                    validations.get(key).cloned(),
                    Rc::clone(&self.notifier),
                );
                self.fields.insert(key.to_string(), field);
            }
        }
        self.validations = validations;
    }

    /// Mark every field as touched
    pub fn touch(&mut self) {
        self.touch_silent();
        self.emit_update();
    }

    fn touch_silent(&mut self) {
        for field in self.fields.values_mut() {
            field.touch_silent();
        }
    }

    fn set_status(&self, status: SubmissionStatus) {
        tracing::info!(from = %self.status.get(), to = %status, "Submission status changed");
        self.status.set(status);
        self.emit_update();
    }

    fn emit_update(&self) {
        if let Some(on_update) = &self.on_update {
            on_update();
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("model", &self.model())
            .field("status", &self.status.get())
            .field("error", &self.error)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Notifier for top-level fields: a change settles a finished submission
/// back to idle, then the update callback runs.
fn root_notifier(
    status: &Rc<Cell<SubmissionStatus>>,
    on_update: Option<UpdateCallback>,
) -> Notifier {
    let status = Rc::clone(status);
    Rc::new(move |event: &FieldEvent| {
        tracing::trace!(?event, "Field event reached form");
        if matches!(event, FieldEvent::Changed(_)) && status.get().is_settled() {
            tracing::info!(from = %status.get(), to = %SubmissionStatus::Idle, "Submission status changed");
            status.set(SubmissionStatus::Idle);
        }
        if let Some(on_update) = &on_update {
            on_update();
        }
    })
}

/// One field per model property, plus one per validated property the model
/// does not have yet
fn build_root_fields(
    ctx: &Rc<FieldContext>,
    validations: &Validations,
    notifier: &Notifier,
) -> IndexMap<String, Field> {
    let model = ctx.store.model();
    let mut keys: Vec<String> = model
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    for key in validations.keys() {
        if !keys.iter().any(|existing| existing == key) {
            keys.push(key.to_string());
        }
    }

    keys.into_iter()
        .map(|key| {
            let field = build_field(
                ctx,
                FieldPath::root().key(key.as_str()),
                validations.get(&key).cloned(),
                Rc::clone(notifier),
            );
            (key, field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{MockSubmitErrorHandler, MockSubmitEvent, MockSubmitHandler};
    use crate::validation::Rule;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use std::cell::RefCell;

    fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move || inner.set(inner.get() + 1))
    }

    fn person_form(options: FormOptions) -> Form {
        Form::new(
            json!({"name": "", "age": 18}),
            options.validations(Validations::new().rule("name", Rule::required())),
        )
        .unwrap()
    }

    mod construction {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_rejects_non_object_model() {
            let err = Form::new(json!([1]), FormOptions::new()).unwrap_err();
            assert!(matches!(err, FormError::ModelNotObject { kind: "array" }));
        }

        #[test]
        fn test_fields_follow_model_then_validations() {
            let form = Form::new(
                json!({"name": "", "age": 18}),
                FormOptions::new().validations(Validations::new().rule("email", Rule::required())),
            )
            .unwrap();
            assert_eq!(form.fields().keys().collect::<Vec<_>>(), vec!["name", "age", "email"]);
            // Validated-only properties are not written into the model
            assert_eq!(*form.model(), json!({"name": "", "age": 18}));
            assert!(!form.valid());
        }

        #[test]
        fn test_typed_round_trip() {
            #[derive(Serialize, Deserialize, Debug, PartialEq)]
            struct Person {
                name: String,
                age: u32,
            }
            let mut form = Form::from_model(
                &Person {
                    name: "Ann".into(),
                    age: 30,
                },
                FormOptions::new(),
            )
            .unwrap();
            form.field_mut("age").unwrap().on_change(31);
            let person: Person = form.model_as().unwrap();
            assert_eq!(
                person,
                Person {
                    name: "Ann".into(),
                    age: 31
                }
            );
        }
    }

    mod changes {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_on_update_called_once_per_change() {
            let (count, on_update) = counter();
            let mut form = person_form(FormOptions::new().on_update(on_update));
            form.field_mut("name").unwrap().on_change("F");
            form.field_mut("name").unwrap().on_change("Fr");
            assert_eq!(count.get(), 2);
        }

        #[test]
        fn test_changes_lists_dirty_top_level_properties() {
            let mut form = person_form(FormOptions::new());
            assert!(form.changes().is_empty());
            form.field_mut("age").unwrap().on_change(19);
            assert_eq!(Value::Object(form.changes()), json!({"age": 19}));
            assert!(form.dirty());

            form.field_mut("age").unwrap().on_change(18);
            assert!(form.changes().is_empty());
            assert!(!form.dirty());
        }

        #[test]
        fn test_update_fields_notifies_per_key() {
            let (count, on_update) = counter();
            let mut form = person_form(FormOptions::new().on_update(on_update));
            form.update_fields(json!({"name": "Freddy", "age": 40})).unwrap();
            assert_eq!(count.get(), 2);
            assert_eq!(*form.model(), json!({"name": "Freddy", "age": 40}));
        }

        #[test]
        fn test_update_fields_adds_unknown_keys() {
            let mut form = person_form(FormOptions::new());
            form.update_fields(json!({"tags": ["a"]})).unwrap();
            assert_eq!(form.field("tags").unwrap().elements().len(), 1);
            assert_eq!(Value::Object(form.changes()), json!({"tags": ["a"]}));
        }

        #[test]
        fn test_update_fields_rejects_non_object() {
            let mut form = person_form(FormOptions::new());
            assert!(form.update_fields(json!("x")).is_err());
        }

        #[test]
        fn test_model_snapshot_is_stable() {
            let mut form = person_form(FormOptions::new());
            let before = form.model();
            form.field_mut("name").unwrap().on_change("Freddy");
            assert_eq!(*before, json!({"name": "", "age": 18}));
            assert_eq!(form.model()["name"], json!("Freddy"));
        }

        #[test]
        fn test_find_by_path() {
            let mut form = Form::new(
                json!({"address": {"streetName": ""}, "emails": ["a"]}),
                FormOptions::new(),
            )
            .unwrap();
            form.find_mut("address.streetName").unwrap().on_change("X");
            assert_eq!(form.find("emails.0").unwrap().value(), json!("a"));
            assert!(form.find("emails.3").is_none());
            assert!(matches!(
                form.find_mut("0"),
                Err(FormError::FieldNotFound { .. })
            ));
            assert_eq!(form.model()["address"]["streetName"], json!("X"));
        }
    }

    mod reset {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reset_restores_model_and_clears_state() {
            let mut form = person_form(FormOptions::new());
            form.update_fields(json!({"name": "Freddy", "age": 40})).unwrap();
            form.touch();

            form.reset();
            assert_eq!(form.model(), form.original_model());
            assert!(!form.dirty());
            assert!(!form.field("name").unwrap().touched());
        }

        #[test]
        fn test_reset_with_replaces_snapshot() {
            let mut form = person_form(FormOptions::new());
            form.field_mut("name").unwrap().on_change("x");
            form.reset_with(json!({"name": "Neo", "city": "Zion"})).unwrap();

            assert_eq!(*form.original_model(), json!({"name": "Neo", "city": "Zion"}));
            assert!(!form.dirty());
            assert_eq!(
                form.fields().keys().collect::<Vec<_>>(),
                vec!["name", "city"]
            );
            assert!(form.valid());
        }

        #[test]
        fn test_set_validations_then_validate() {
            let mut form = Form::new(json!({"email": "nope"}), FormOptions::new()).unwrap();
            assert!(form.validate());
            form.set_validations(Validations::new().rule("email", Rule::email()));
            assert!(!form.validate());
            assert_eq!(form.errors().keys().collect::<Vec<_>>(), vec!["email"]);
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_invalid_submit_is_dropped() {
            let mut handler = MockSubmitHandler::new();
            handler.expect_submit().times(0);
            let mut form = person_form(FormOptions::new().on_submit(handler));

            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Idle);
            assert!(form.field("name").unwrap().touched());
            assert!(form.field("age").unwrap().touched());
        }

        #[tokio::test]
        async fn test_valid_submit_calls_handler_once() {
            let mut handler = MockSubmitHandler::new();
            handler
                .expect_submit()
                .withf(|form| form.model()["name"] == "Freddy")
                .times(1)
                .returning(|_| Ok(()));
            let mut form = person_form(FormOptions::new().on_submit(handler));
            form.field_mut("name").unwrap().on_change("Freddy");

            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);
        }

        #[tokio::test]
        async fn test_valid_submit_reaches_submitted() {
            let seen_model = Rc::new(RefCell::new(Value::Null));
            let sink = Rc::clone(&seen_model);
            let mut form = person_form(FormOptions::new().on_submit(
                move |form: &Form| -> anyhow::Result<()> {
                    assert!(form.is_submitting());
                    *sink.borrow_mut() = form.model().as_ref().clone();
                    Ok(())
                },
            ));
            form.field_mut("name").unwrap().on_change("Freddy");

            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);
            assert_eq!(*seen_model.borrow(), json!({"name": "Freddy", "age": 18}));
        }

        #[tokio::test]
        async fn test_submit_calls_prevent_default() {
            let mut event = MockSubmitEvent::new();
            event.expect_prevent_default().times(1).return_const(());
            let mut form = person_form(FormOptions::new());

            form.submit(Some(&mut event)).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Idle);
        }

        #[tokio::test]
        async fn test_handler_failure_is_captured() {
            let mut on_error = MockSubmitErrorHandler::new();
            on_error
                .expect_on_submit_error()
                .withf(|error| error.to_string() == "x")
                .times(1)
                .return_const(());
            let mut form = person_form(
                FormOptions::new()
                    .on_submit(|_: &Form| -> anyhow::Result<()> { Err(anyhow::anyhow!("x")) })
                    .on_submit_error(on_error),
            );
            form.field_mut("name").unwrap().on_change("Freddy");

            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Error);
            assert_eq!(form.error().unwrap().to_string(), "x");
        }

        #[tokio::test]
        async fn test_change_after_error_returns_to_idle_keeping_error() {
            let mut form = person_form(
                FormOptions::new()
                    .on_submit(|_: &Form| -> anyhow::Result<()> { anyhow::bail!("boom") }),
            );
            form.field_mut("name").unwrap().on_change("Freddy");
            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Error);

            form.field_mut("age").unwrap().on_change(20);
            assert_eq!(form.submission_status(), SubmissionStatus::Idle);
            assert!(form.error().is_some());

            form.reset_error();
            assert!(form.error().is_none());
            assert_eq!(form.submission_status(), SubmissionStatus::Idle);
        }

        #[tokio::test]
        async fn test_touch_after_submitted_keeps_status() {
            let mut form = person_form(FormOptions::new());
            form.field_mut("name").unwrap().on_change("Freddy");
            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);

            form.field_mut("name").unwrap().on_blur();
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);
        }

        #[tokio::test]
        async fn test_reset_keeps_error() {
            let mut form = person_form(
                FormOptions::new()
                    .on_submit(|_: &Form| -> anyhow::Result<()> { anyhow::bail!("boom") }),
            );
            form.field_mut("name").unwrap().on_change("Freddy");
            form.submit(None).await;

            form.reset();
            assert_eq!(form.submission_status(), SubmissionStatus::Idle);
            assert!(form.error().is_some());
        }

        #[tokio::test]
        async fn test_swapped_handler_is_used() {
            let mut form = person_form(FormOptions::new().on_submit(
                |_: &Form| -> anyhow::Result<()> { anyhow::bail!("old handler") },
            ));
            form.set_on_submit(|_: &Form| -> anyhow::Result<()> { Ok(()) });
            form.field_mut("name").unwrap().on_change("Freddy");

            form.submit(None).await;
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);
        }

        #[test]
        fn test_submit_runs_on_block_on() {
            let mut form = person_form(FormOptions::new());
            form.field_mut("name").unwrap().on_change("Freddy");
            tokio_test::block_on(form.submit(None));
            assert_eq!(form.submission_status(), SubmissionStatus::Submitted);
        }
    }
}
