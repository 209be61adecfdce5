//! Trait seams for the collaborators a form calls out to

use crate::state::Form;
use async_trait::async_trait;

/// Receives a valid form on submit.
///
/// Any error returned is captured into the form's submission state.
/// Implemented for plain closures `Fn(&Form) -> anyhow::Result<()>`; async
/// handlers implement the trait directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait SubmitHandler {
    async fn submit(&self, form: &Form) -> anyhow::Result<()>;
}

#[async_trait(?Send)]
impl<F> SubmitHandler for F
where
    F: Fn(&Form) -> anyhow::Result<()>,
{
    async fn submit(&self, form: &Form) -> anyhow::Result<()> {
        self(form)
    }
}

/// Notified when a submit handler fails, after the form recorded the error
#[cfg_attr(test, mockall::automock)]
pub trait SubmitErrorHandler {
    fn on_submit_error(&self, error: &anyhow::Error);
}

impl<F> SubmitErrorHandler for F
where
    F: Fn(&anyhow::Error),
{
    fn on_submit_error(&self, error: &anyhow::Error) {
        self(error)
    }
}

/// Event-like value passed to submit, e.g. a DOM submit event
#[cfg_attr(test, mockall::automock)]
pub trait SubmitEvent {
    fn prevent_default(&mut self);
}
