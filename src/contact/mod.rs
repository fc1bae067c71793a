//! Contact form.
//!
//! This module handles:
//! - Form fields, focus, and validation
//! - The submit status lifecycle (idle, submitting, success, error)
//! - Delivering messages through a [`Mailer`] on a worker thread

mod dispatch;
mod mailer;

pub use dispatch::Dispatcher;
pub use mailer::{EmailJsCredentials, EmailJsMailer, Mailer, OutboxMailer, mailer_from_env};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a success or error status stays visible.
pub const STATUS_RESET_MS: u64 = 3_000;

/// Errors raised while validating or sending a message.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{} is required", .0.label())]
    MissingField(Field),
    #[error("{0:?} is not a valid email address")]
    InvalidEmail(String),
    #[error("a message is already being sent")]
    Busy,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail service returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to write outbox {}: {source}", path.display())]
    Outbox {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field {
    #[default]
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Your name",
            Self::Email => "your.email@example.com",
            Self::Subject => "What is this about?",
            Self::Message => "Your message here...",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Email => 1,
            Self::Subject => 2,
            Self::Message => 3,
        }
    }

    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl FormStatus {
    /// Banner text for the current status, if any.
    pub const fn banner(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Submitting => Some("Sending..."),
            Self::Success => Some("Message sent successfully! I'll get back to you soon."),
            Self::Error(_) => Some("Failed to send message. Please try again later."),
        }
    }
}

/// Message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub to_email: String,
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
}

/// Editable contact form state.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    recipient: String,
    values: [String; 4],
    focus: Field,
    status: FormStatus,
    status_since_ms: u64,
}

impl ContactForm {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            ..Self::default()
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub const fn focus(&self) -> Field {
        self.focus
    }

    pub const fn status(&self) -> &FormStatus {
        &self.status
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.status, FormStatus::Submitting)
    }

    pub const fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub const fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub const fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    /// Type into the focused field. Ignored while a send is in flight.
    ///
    /// Only the message field takes line breaks.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let newline = ch == '\n' && self.focus == Field::Message;
        if self.is_submitting() || (ch.is_control() && !newline) {
            return false;
        }
        self.values[self.focus.index()].push(ch);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.values[self.focus.index()].pop().is_some()
    }

    /// Check the fields and build the outgoing message.
    ///
    /// # Errors
    /// Returns the first empty field in tab order, or an invalid email.
    pub fn validate(&self) -> Result<ContactPayload, ContactError> {
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        let email = self.value(Field::Email).trim();
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }
        Ok(ContactPayload {
            to_email: self.recipient.clone(),
            from_name: self.value(Field::Name).trim().to_string(),
            from_email: email.to_string(),
            subject: self.value(Field::Subject).trim().to_string(),
            message: self.value(Field::Message).trim().to_string(),
        })
    }

    /// Validate and move into `Submitting`.
    ///
    /// Validation failures leave the status untouched and move focus to the
    /// offending field.
    ///
    /// # Errors
    /// Returns [`ContactError::Busy`] while a send is in flight, or the
    /// validation error.
    pub fn submit(&mut self, now_ms: u64) -> Result<ContactPayload, ContactError> {
        if self.is_submitting() {
            return Err(ContactError::Busy);
        }
        match self.validate() {
            Ok(payload) => {
                self.set_status(FormStatus::Submitting, now_ms);
                Ok(payload)
            }
            Err(err) => {
                match &err {
                    ContactError::MissingField(field) => self.focus = *field,
                    ContactError::InvalidEmail(_) => self.focus = Field::Email,
                    _ => {}
                }
                Err(err)
            }
        }
    }

    /// Record the outcome of a send. Success clears the fields.
    pub fn complete(&mut self, result: Result<(), String>, now_ms: u64) {
        match result {
            Ok(()) => {
                self.values = Default::default();
                self.focus = Field::Name;
                self.set_status(FormStatus::Success, now_ms);
            }
            Err(reason) => self.set_status(FormStatus::Error(reason), now_ms),
        }
    }

    /// Return to `Idle` once a result has been shown long enough.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.status_deadline_ms() {
            Some(deadline) if now_ms >= deadline => {
                self.status = FormStatus::Idle;
                true
            }
            _ => false,
        }
    }

    /// When the current result banner expires.
    pub const fn status_deadline_ms(&self) -> Option<u64> {
        match self.status {
            FormStatus::Success | FormStatus::Error(_) => {
                Some(self.status_since_ms.saturating_add(STATUS_RESET_MS))
            }
            FormStatus::Idle | FormStatus::Submitting => None,
        }
    }

    fn set_status(&mut self, status: FormStatus, now_ms: u64) {
        self.status = status;
        self.status_since_ms = now_ms;
    }
}

/// Loose `local@domain.tld` check, the same bar a browser email input sets.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split_once('.').is_some_and(|(head, tail)| {
            !head.is_empty() && !tail.is_empty() && !tail.ends_with('.')
        })
}
