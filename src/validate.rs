//! Per-step gates for the quote wizard.
//!
//! Gates only check presence. Format checks (email shape, lengths) belong to
//! the standalone contact form in [`crate::contact`].

use serde::Deserialize;

use crate::quote::QuoteRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    TripType,
    Route,
    Schedule,
    Aircraft,
    Services,
    Contact,
    Review,
}

impl WizardStep {
    pub fn title_key(self) -> &'static str {
        match self {
            WizardStep::TripType => "steps.trip_type",
            WizardStep::Route => "steps.route",
            WizardStep::Schedule => "steps.schedule",
            WizardStep::Aircraft => "steps.aircraft",
            WizardStep::Services => "steps.services",
            WizardStep::Contact => "steps.contact",
            WizardStep::Review => "steps.review",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WizardStep::TripType => "⇄",
            WizardStep::Route => "⌖",
            WizardStep::Schedule => "▦",
            WizardStep::Aircraft => "✈",
            WizardStep::Services => "✚",
            WizardStep::Contact => "✉",
            WizardStep::Review => "✓",
        }
    }
}

/// A required input, reported when a gate refuses to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TripType,
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    Aircraft,
    Name,
    Email,
    Phone,
}

impl Field {
    pub fn label_key(self) -> &'static str {
        match self {
            Field::TripType => "fields.trip_type",
            Field::Origin => "fields.origin",
            Field::Destination => "fields.destination",
            Field::DepartureDate => "fields.departure_date",
            Field::ReturnDate => "fields.return_date",
            Field::Aircraft => "fields.aircraft",
            Field::Name => "fields.name",
            Field::Email => "fields.email",
            Field::Phone => "fields.phone",
        }
    }
}

/// Whether a round trip must have a return date before leaving the schedule
/// step. The lenient rule exists only for parity with the reservation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnDatePolicy {
    #[default]
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: WizardStep,
    pub missing: Vec<Field>,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn missing_fields(
    step: WizardStep,
    request: &QuoteRequest,
    policy: ReturnDatePolicy,
) -> Vec<Field> {
    let mut missing = Vec::new();

    match step {
        WizardStep::TripType => {
            if request.trip_type().is_none() {
                missing.push(Field::TripType);
            }
        }
        WizardStep::Route => {
            if blank(&request.origin) {
                missing.push(Field::Origin);
            }
            if blank(&request.destination) {
                missing.push(Field::Destination);
            }
        }
        WizardStep::Schedule => {
            if request.departure_date().is_none() {
                missing.push(Field::DepartureDate);
            }
            if policy == ReturnDatePolicy::Required
                && request.is_round_trip()
                && request.return_date().is_none()
            {
                missing.push(Field::ReturnDate);
            }
        }
        WizardStep::Aircraft => {
            if request.aircraft().is_none() {
                missing.push(Field::Aircraft);
            }
        }
        WizardStep::Contact => {
            if blank(&request.contact.name) {
                missing.push(Field::Name);
            }
            if blank(&request.contact.email) {
                missing.push(Field::Email);
            }
            if blank(&request.contact.phone) {
                missing.push(Field::Phone);
            }
        }
        WizardStep::Services | WizardStep::Review => {}
    }

    missing
}

pub fn can_advance(step: WizardStep, request: &QuoteRequest, policy: ReturnDatePolicy) -> bool {
    missing_fields(step, request, policy).is_empty()
}

/// Runs every gate in order and reports the first step that fails.
pub fn validate_all(
    steps: &[WizardStep],
    request: &QuoteRequest,
    policy: ReturnDatePolicy,
) -> Result<(), StepFailure> {
    for &step in steps {
        let missing = missing_fields(step, request, policy);
        if !missing.is_empty() {
            return Err(StepFailure { step, missing });
        }
    }
    Ok(())
}
