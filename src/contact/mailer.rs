//! Message delivery backends.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::{ContactError, ContactPayload};

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can deliver a contact message.
pub trait Mailer: Send + Sync {
    /// Deliver one message, blocking until it is accepted or rejected.
    ///
    /// # Errors
    /// Returns an error if the message could not be delivered.
    fn send(&self, payload: &ContactPayload) -> Result<(), ContactError>;

    /// Short name for logs and the status bar.
    fn describe(&self) -> String;
}

/// Keys identifying an EmailJS service and template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl EmailJsCredentials {
    /// Read credentials from `FOLIO_EMAILJS_*`; all three must be set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            service_id: var("FOLIO_EMAILJS_SERVICE_ID")?,
            template_id: var("FOLIO_EMAILJS_TEMPLATE_ID")?,
            public_key: var("FOLIO_EMAILJS_PUBLIC_KEY")?,
        })
    }
}

#[derive(Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ContactPayload,
}

/// Sends through the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsMailer {
    credentials: EmailJsCredentials,
    endpoint: String,
}

impl EmailJsMailer {
    pub fn new(credentials: EmailJsCredentials) -> Self {
        Self {
            credentials,
            endpoint: EMAILJS_ENDPOINT.to_string(),
        }
    }

    /// Point at a different endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Mailer for EmailJsMailer {
    fn send(&self, payload: &ContactPayload) -> Result<(), ContactError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let body = EmailJsRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            template_params: payload,
        };
        debug!(endpoint = %self.endpoint, "posting contact message");
        let response = client.post(&self.endpoint).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        info!("contact message delivered via EmailJS");
        Ok(())
    }

    fn describe(&self) -> String {
        "EmailJS".to_string()
    }
}

/// Appends messages to a local JSON-lines file.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    path: PathBuf,
}

impl OutboxMailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, payload: &ContactPayload) -> Result<(), ContactError> {
        let line = serde_json::to_string(payload)?;
        let outbox_err = |source| ContactError::Outbox {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(outbox_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(outbox_err)?;
        writeln!(file, "{line}").map_err(outbox_err)?;
        info!(path = %self.path.display(), "contact message written to outbox");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("outbox {}", self.path.display())
    }
}

/// EmailJS when credentials are configured, otherwise the outbox file.
pub fn mailer_from_env(outbox: &Path) -> Box<dyn Mailer> {
    EmailJsCredentials::from_env().map_or_else(
        || {
            debug!(path = %outbox.display(), "EmailJS not configured, using outbox");
            Box::new(OutboxMailer::new(outbox)) as Box<dyn Mailer>
        },
        |credentials| Box::new(EmailJsMailer::new(credentials)) as Box<dyn Mailer>,
    )
}
