//! Simulated submission backend.
//!
//! There is no booking service behind the wizard. [`SimulatedBackend`] waits
//! a fixed delay and then accepts (or, when configured to, rejects) whatever
//! it is given, handing back a reference number.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::contact::ContactForm;
use crate::quote::QuoteRequest;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

static NEXT_SEQUENCE: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Submission {
    Quote(QuoteRequest),
    Contact(ContactForm),
}

impl Submission {
    fn reference_prefix(&self) -> &'static str {
        match self {
            Submission::Quote(_) => "QT",
            Submission::Contact(_) => "CT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
    pub submitted_at: DateTime<Local>,
    pub submission: Submission,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("the request could not be delivered, please try again later")]
    Rejected,
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: Submission) -> Result<Receipt, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    fail: bool,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    /// A backend whose every submission ends in [`SubmitError::Rejected`].
    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Submitter for SimulatedBackend {
    async fn submit(&self, submission: Submission) -> Result<Receipt, SubmitError> {
        if let Ok(json) = serde_json::to_string(&submission) {
            debug!(payload = %json, "submitting");
        }

        tokio::time::sleep(self.delay).await;

        if self.fail {
            warn!("simulated submission rejected");
            return Err(SubmitError::Rejected);
        }

        let submitted_at = Local::now();
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let reference = format!(
            "{}-{}-{:03}",
            submission.reference_prefix(),
            submitted_at.year(),
            seq
        );
        info!(%reference, "submission accepted");

        Ok(Receipt {
            reference,
            submitted_at,
            submission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_delay() {
        let backend = SimulatedBackend::default();
        let start = tokio::time::Instant::now();
        let receipt = backend
            .submit(Submission::Quote(QuoteRequest::new(None, 20)))
            .await
            .unwrap();
        assert!(start.elapsed() >= DEFAULT_DELAY);
        assert!(receipt.reference.starts_with("QT-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_reference_prefix() {
        let backend = SimulatedBackend::new(Duration::from_millis(10));
        let receipt = backend
            .submit(Submission::Contact(ContactForm::default()))
            .await
            .unwrap();
        assert!(receipt.reference.starts_with("CT-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_backend_rejects() {
        let backend = SimulatedBackend::failing(Duration::from_millis(10));
        let result = backend
            .submit(Submission::Quote(QuoteRequest::new(None, 20)))
            .await;
        assert_eq!(result, Err(SubmitError::Rejected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_references_are_distinct() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let a = backend
            .submit(Submission::Quote(QuoteRequest::new(None, 20)))
            .await
            .unwrap();
        let b = backend
            .submit(Submission::Quote(QuoteRequest::new(None, 20)))
            .await
            .unwrap();
        assert_ne!(a.reference, b.reference);
    }
}
