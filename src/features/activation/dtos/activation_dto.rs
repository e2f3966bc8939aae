use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::activation::models::{ScanOutcome, ScanTransition, Ticket};
use crate::features::activation::payload::PayloadForm;

/// Raw text read by a camera or typed by an operator
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScanRequestDto {
    #[validate(length(min = 1, max = 2048, message = "Payload must be 1-2048 characters"))]
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct ParsePayloadQuery {
    #[validate(length(min = 1, max = 2048, message = "Payload must be 1-2048 characters"))]
    pub payload: String,
}

/// Response DTO for a completed scan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanResultDto {
    /// Record exactly as returned by the booking backend
    pub ticket: Ticket,
    /// Display label derived from `ticket.is_activated`
    pub transition: ScanTransition,
    /// Activation state seen by the lookup before toggling
    pub previously_activated: bool,
    /// The ticket was flipped by another device between lookup and toggle
    pub concurrent_scan_suspected: bool,
    /// How the serial was read, when it came from a scanned payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<PayloadForm>,
}

impl ScanResultDto {
    pub fn with_form(mut self, form: PayloadForm) -> Self {
        self.form = Some(form);
        self
    }
}

impl From<ScanOutcome> for ScanResultDto {
    fn from(outcome: ScanOutcome) -> Self {
        let concurrent_scan_suspected = outcome.concurrent_scan_suspected();
        Self {
            ticket: outcome.ticket,
            transition: outcome.transition,
            previously_activated: outcome.previously_activated,
            concurrent_scan_suspected,
            form: None,
        }
    }
}
