#![forbid(unsafe_code)]

//! Contact form submission workflow.
//!
//! ```text
//! Idle -> Validating -> Sending -> {Succeeded, Failed} -> Idle
//!              \-> Idle (validation error)
//! ```
//!
//! The submit control is the only lock: a [`SubmitGuard`] disables it and
//! swaps its label for the duration of the send, and restores both when
//! dropped, whichever way the send resolves. A submit that arrives while a
//! submission is in flight is reported as [`SubmitOutcome::Busy`]; the
//! form's own state decides that, not the control's `disabled` attribute.
//!
//! The email collaborator is abstracted as [`EmailSender`]; the browser
//! binding lives in `folio-web`.

use std::cell::Cell;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EmailConfig;
use crate::dom::{Dom, ElementId, selectors};
use crate::feedback::{Feedback, StatusKind};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const FAILURE_MESSAGE: &str =
    "Oops! Something went wrong. Please try again or contact me directly.";
pub const SENDING_LABEL: &str = "Sending...";

/// Form field names.
pub const FIELD_NAME: &str = "from_name";
pub const FIELD_EMAIL: &str = "from_email";
pub const FIELD_MESSAGE: &str = "message";

/// Why a submission was refused before sending. `Display` is the message
/// shown to the visitor.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingField,

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Rejection from the email collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("email send failed (status {status:?}): {text}")]
pub struct SendError {
    pub status: Option<u16>,
    pub text: String,
}

impl SendError {
    #[must_use]
    pub fn new(status: Option<u16>, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

/// Successful response from the email collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub status: u16,
    pub text: String,
}

/// Template parameters sent with every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_name: String,
}

/// Transactional email collaborator.
#[allow(async_fn_in_trait)]
pub trait EmailSender {
    /// Send one message. No timeout is applied.
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<SendResponse, SendError>;
}

/// Trimmed field values of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// Check required fields, then the email shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ValidationError::MissingField);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    #[must_use]
    pub fn into_params(self, to_name: &str) -> TemplateParams {
        TemplateParams {
            from_name: self.name,
            from_email: self.email,
            message: self.message,
            to_name: to_name.to_string(),
        }
    }
}

/// Structural email check: `local@domain.tld`, no whitespace, one `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Sending,
    Succeeded,
    Failed,
}

impl FormState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Sending => "sending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Result of one submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Refused before sending.
    Rejected(ValidationError),
    /// A submission was already in flight.
    Busy,
    Sent(SendResponse),
    Failed(SendError),
}

/// Locks the submit control for the lifetime of a send.
///
/// Acquiring disables the control and shows the sending label; dropping
/// re-enables it and restores the label it had before.
#[must_use = "the submit control unlocks when the guard is dropped"]
pub struct SubmitGuard<'a, D: Dom + ?Sized> {
    dom: &'a D,
    button: ElementId,
    label: String,
}

impl<'a, D: Dom + ?Sized> SubmitGuard<'a, D> {
    pub fn acquire(dom: &'a D, button: ElementId, sending_label: &str) -> Self {
        let label = dom.text(button);
        dom.set_text(button, sending_label);
        dom.set_disabled(button, true);
        Self { dom, button, label }
    }
}

impl<D: Dom + ?Sized> Drop for SubmitGuard<'_, D> {
    fn drop(&mut self) {
        self.dom.set_text(self.button, &self.label);
        self.dom.set_disabled(self.button, false);
    }
}

/// The page's contact form.
#[derive(Debug)]
pub struct ContactForm {
    form: ElementId,
    name: ElementId,
    email: ElementId,
    message: ElementId,
    submit: ElementId,
    email_config: EmailConfig,
    state: Cell<FormState>,
}

impl ContactForm {
    /// Locate the form, its three fields and the submit control.
    ///
    /// Returns `None` when any of them is missing from the markup.
    pub fn bind<D: Dom + ?Sized>(dom: &D, email_config: EmailConfig) -> Option<Self> {
        let form = dom.by_id(selectors::CONTACT_FORM_ID)?;
        let field = |name: &str| dom.query_within(form, &format!("[name=\"{name}\"]"));
        let (Some(name), Some(email), Some(message), Some(submit)) = (
            field(FIELD_NAME),
            field(FIELD_EMAIL),
            field(FIELD_MESSAGE),
            dom.by_id(selectors::SUBMIT_BUTTON_ID),
        ) else {
            tracing::debug!(target: "folio.form", "contact form markup incomplete; form disabled");
            return None;
        };
        Some(Self {
            form,
            name,
            email,
            message,
            submit,
            email_config,
            state: Cell::new(FormState::Idle),
        })
    }

    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.form
    }

    #[must_use]
    pub const fn submit_button(&self) -> ElementId {
        self.submit
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.state.get()
    }

    /// Current trimmed field values.
    pub fn read_fields<D: Dom + ?Sized>(&self, dom: &D) -> ContactFields {
        ContactFields::new(
            &dom.value(self.name),
            &dom.value(self.email),
            &dom.value(self.message),
        )
    }

    /// Clear every field.
    pub fn reset<D: Dom + ?Sized>(&self, dom: &D) {
        for field in [self.name, self.email, self.message] {
            dom.set_value(field, "");
        }
    }

    fn transition(&self, next: FormState) {
        tracing::trace!(
            target: "folio.form",
            from = self.state.get().as_str(),
            to = next.as_str(),
            "form state"
        );
        self.state.set(next);
    }

    /// Handle one submit event.
    pub async fn submit<D, S>(&self, dom: &D, sender: &S, feedback: &Feedback) -> SubmitOutcome
    where
        D: Dom + ?Sized,
        S: EmailSender,
    {
        if self.state.get() != FormState::Idle {
            tracing::debug!(target: "folio.form", state = self.state.get().as_str(), "submit ignored while busy");
            return SubmitOutcome::Busy;
        }

        self.transition(FormState::Validating);
        let fields = self.read_fields(dom);
        if let Err(err) = fields.validate() {
            tracing::debug!(target: "folio.form", reason = ?err, "submission rejected");
            feedback.show(dom, &err.to_string(), StatusKind::Error);
            self.transition(FormState::Idle);
            return SubmitOutcome::Rejected(err);
        }

        self.transition(FormState::Sending);
        let outcome = {
            let _guard = SubmitGuard::acquire(dom, self.submit, SENDING_LABEL);
            let params = fields.into_params(&self.email_config.owner_name);
            let result = sender
                .send(
                    &self.email_config.service_id,
                    &self.email_config.template_id,
                    &params,
                )
                .await;
            match result {
                Ok(response) => {
                    tracing::info!(
                        target: "folio.form",
                        status = response.status,
                        text = %response.text,
                        "message sent"
                    );
                    self.transition(FormState::Succeeded);
                    feedback.show(dom, SUCCESS_MESSAGE, StatusKind::Success);
                    self.reset(dom);
                    SubmitOutcome::Sent(response)
                }
                Err(err) => {
                    tracing::warn!(
                        target: "folio.form",
                        status = ?err.status,
                        error = %err.text,
                        "message send failed"
                    );
                    self.transition(FormState::Failed);
                    feedback.show(dom, FAILURE_MESSAGE, StatusKind::Error);
                    SubmitOutcome::Failed(err)
                }
            }
        };
        self.transition(FormState::Idle);
        outcome
    }
}
