//! Quote wizard state machine.
//!
//! `Wizard` owns the [`QuoteRequest`] for its whole life and moves through
//! `Editing(1..=n) -> Submitting -> Submitted | Error`. It knows nothing about
//! terminals or async runtimes: `begin_submit` hands out the payload and
//! `finish_submit` takes the outcome back, so the caller decides where the
//! wait happens.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::i18n::Translator;
use crate::pricing::format_euros;
use crate::quote::{QuoteRequest, TripType};
use crate::submit::{Receipt, SubmitError, Submission, Submitter};
use crate::validate::{self, Field, ReturnDatePolicy, StepFailure, WizardStep};

const QUOTE_STEPS: [WizardStep; 6] = [
    WizardStep::TripType,
    WizardStep::Route,
    WizardStep::Schedule,
    WizardStep::Aircraft,
    WizardStep::Services,
    WizardStep::Contact,
];

const RESERVATION_STEPS: [WizardStep; 4] = [
    WizardStep::Route,
    WizardStep::Schedule,
    WizardStep::Contact,
    WizardStep::Review,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Six-step quote flow with aircraft and extras.
    #[default]
    Quote,
    /// Older four-step reservation flow. Deprecated; kept for comparison.
    Reservation,
}

impl Variant {
    pub fn steps(self) -> &'static [WizardStep] {
        match self {
            Variant::Quote => &QUOTE_STEPS,
            Variant::Reservation => &RESERVATION_STEPS,
        }
    }

    pub fn initial_trip_type(self) -> Option<TripType> {
        match self {
            Variant::Quote => None,
            Variant::Reservation => Some(TripType::OneWay),
        }
    }

    pub fn max_passengers(self) -> u8 {
        match self {
            Variant::Quote => 20,
            Variant::Reservation => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// 1-based index into the variant's step list.
    Editing(usize),
    Submitting,
    Submitted(Receipt),
    Error(SubmitError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Blocked(Vec<Field>),
    AtEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("submission is only possible from the last step")]
    NotAtFinalStep,
    #[error("the request is incomplete at step {:?}", .0.step)]
    Incomplete(StepFailure),
    #[error("the request was already submitted")]
    AlreadySubmitted,
    #[error("nothing to retry")]
    NothingToRetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, dismissible message shown after a submission resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title_key: &'static str,
    pub body_key: &'static str,
}

pub struct Wizard {
    variant: Variant,
    policy: ReturnDatePolicy,
    max_passengers: u8,
    today: NaiveDate,
    request: QuoteRequest,
    phase: Phase,
    notice: Option<Notice>,
}

impl Wizard {
    pub fn new(variant: Variant, policy: ReturnDatePolicy, today: NaiveDate) -> Self {
        Self::with_max_passengers(variant, policy, today, variant.max_passengers())
    }

    pub fn with_max_passengers(
        variant: Variant,
        policy: ReturnDatePolicy,
        today: NaiveDate,
        max_passengers: u8,
    ) -> Self {
        Self {
            variant,
            policy,
            max_passengers,
            today,
            request: QuoteRequest::new(variant.initial_trip_type(), max_passengers),
            phase: Phase::Editing(1),
            notice: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn policy(&self) -> ReturnDatePolicy {
        self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn request(&self) -> &QuoteRequest {
        &self.request
    }

    /// The form is read-only while a submission is pending or done.
    pub fn request_mut(&mut self) -> Option<&mut QuoteRequest> {
        match self.phase {
            Phase::Editing(_) | Phase::Error(_) => Some(&mut self.request),
            Phase::Submitting | Phase::Submitted(_) => None,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.variant.steps().len()
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.phase {
            Phase::Editing(n) => Some(n),
            _ => None,
        }
    }

    pub fn active_step(&self) -> Option<WizardStep> {
        self.current_step()
            .and_then(|n| self.variant.steps().get(n - 1).copied())
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step() == Some(self.total_steps())
    }

    pub fn missing_fields(&self) -> Vec<Field> {
        self.active_step()
            .map(|step| validate::missing_fields(step, &self.request, self.policy))
            .unwrap_or_default()
    }

    pub fn can_advance(&self) -> bool {
        self.active_step()
            .is_some_and(|step| validate::can_advance(step, &self.request, self.policy))
    }

    pub fn advance(&mut self) -> Advance {
        let Phase::Editing(n) = self.phase else {
            return Advance::AtEnd;
        };
        if n >= self.total_steps() {
            return Advance::AtEnd;
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!(step = n, ?missing, "advance blocked");
            return Advance::Blocked(missing);
        }

        self.phase = Phase::Editing(n + 1);
        Advance::Moved(n + 1)
    }

    /// Returns whether the step changed. From `Error` this goes back to
    /// editing the last step.
    pub fn retreat(&mut self) -> bool {
        match self.phase {
            Phase::Editing(n) if n > 1 => {
                self.phase = Phase::Editing(n - 1);
                true
            }
            Phase::Error(_) => {
                self.phase = Phase::Editing(self.total_steps());
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn begin_submit(&mut self) -> Result<Submission, WizardError> {
        match self.phase {
            Phase::Submitting => return Err(WizardError::SubmissionInFlight),
            Phase::Submitted(_) => return Err(WizardError::AlreadySubmitted),
            Phase::Error(_) => {}
            Phase::Editing(n) if n == self.total_steps() => {}
            Phase::Editing(_) => return Err(WizardError::NotAtFinalStep),
        }

        validate::validate_all(self.variant.steps(), &self.request, self.policy)
            .map_err(WizardError::Incomplete)?;

        info!(route = %self.request.route(), "submitting quote request");
        self.phase = Phase::Submitting;
        self.notice = None;
        Ok(Submission::Quote(self.request.clone()))
    }

    /// Only valid from `Error`.
    pub fn retry(&mut self) -> Result<Submission, WizardError> {
        if !matches!(self.phase, Phase::Error(_)) {
            return Err(WizardError::NothingToRetry);
        }
        self.begin_submit()
    }

    /// Success clears the form; failure keeps it for resubmission.
    pub fn finish_submit(&mut self, outcome: Result<Receipt, SubmitError>) {
        if self.phase != Phase::Submitting {
            warn!("submission outcome arrived while not submitting; ignored");
            return;
        }

        match outcome {
            Ok(receipt) => {
                self.request =
                    QuoteRequest::new(self.variant.initial_trip_type(), self.max_passengers);
                self.notice = Some(Notice {
                    level: NoticeLevel::Success,
                    title_key: "notice.success_title",
                    body_key: "notice.success_body",
                });
                self.phase = Phase::Submitted(receipt);
            }
            Err(err) => {
                warn!(error = %err, "quote submission failed");
                self.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    title_key: "notice.error_title",
                    body_key: "notice.error_body",
                });
                self.phase = Phase::Error(err);
            }
        }
    }

    /// Runs the whole submission inline. The TUI drives the two halves itself
    /// so it can keep drawing while the backend waits.
    pub async fn submit_with(&mut self, submitter: &dyn Submitter) -> Result<&Phase, WizardError> {
        let submission = self.begin_submit()?;
        let outcome = submitter.submit(submission).await;
        self.finish_submit(outcome);
        Ok(&self.phase)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn estimate(&self) -> Option<u32> {
        self.request.estimate()
    }

    /// Short labels for what has been filled in so far.
    pub fn build_breadcrumb(&self, t: &Translator) -> Vec<String> {
        let req = &self.request;
        let mut crumbs = Vec::new();

        if let Some(trip) = req.trip_type() {
            crumbs.push(t.t(trip.label_key()));
        }
        if !req.origin.trim().is_empty() || !req.destination.trim().is_empty() {
            crumbs.push(req.route());
        }
        if let Some(dep) = req.departure_date() {
            match req.return_date() {
                Some(ret) => crumbs.push(format!(
                    "{} – {}",
                    dep.format("%d/%m/%Y"),
                    ret.format("%d/%m/%Y")
                )),
                None => crumbs.push(dep.format("%d/%m/%Y").to_string()),
            }
        }
        crumbs.push(format!("{} {}", req.passengers(), t.t("summary.pax")));
        if let Some(aircraft) = req.aircraft() {
            crumbs.push(aircraft.name.to_string());
        }
        if !req.services().is_empty() {
            crumbs.push(format!("+{} {}", req.services().len(), t.t("summary.extras")));
        }
        if let Some(total) = self.estimate() {
            crumbs.push(format_euros(total));
        }

        crumbs
    }
}
