use thiserror::Error;

/// What the HTTP client observed when talking to the booking backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unreadable backend response: {0}")]
    Decode(String),
}

/// Which backend call of a scan failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    Lookup,
    Toggle,
}

impl std::fmt::Display for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStage::Lookup => write!(f, "looking up"),
            ScanStage::Toggle => write!(f, "toggling"),
        }
    }
}

/// Failures of the ticket activation protocol
///
/// The three variants need different user messages and retry affordances,
/// so they are never collapsed into one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// Terminal: the serial does not resolve to a record.
    #[error("Ticket '{sno}' not found")]
    TicketNotFound { sno: String },

    /// Recoverable: transport failure, timeout or a backend 5xx during lookup.
    #[error("Booking backend unavailable while {stage} ticket '{sno}': {reason}")]
    TransientNetworkError {
        sno: String,
        stage: ScanStage,
        reason: String,
    },

    /// Terminal for this attempt: lookup succeeded but the toggle was refused.
    #[error("Toggle failed for ticket '{sno}': {message}")]
    ToggleFailed {
        sno: String,
        status: Option<u16>,
        message: String,
    },
}

impl ActivationError {
    /// Map a failed lookup. Only a 404 means the ticket does not exist.
    pub fn from_lookup(sno: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::Status { status: 404, .. } => ActivationError::TicketNotFound {
                sno: sno.to_string(),
            },
            other => ActivationError::TransientNetworkError {
                sno: sno.to_string(),
                stage: ScanStage::Lookup,
                reason: other.to_string(),
            },
        }
    }

    /// Map a failed toggle. Any answer from the backend other than a
    /// readable 2xx is a refusal; only transport failures are transient.
    pub fn from_toggle(sno: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(reason) => ActivationError::TransientNetworkError {
                sno: sno.to_string(),
                stage: ScanStage::Toggle,
                reason,
            },
            GatewayError::Status { status, message } => ActivationError::ToggleFailed {
                sno: sno.to_string(),
                status: Some(status),
                message,
            },
            GatewayError::Decode(message) => ActivationError::ToggleFailed {
                sno: sno.to_string(),
                status: None,
                message,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ActivationError::TicketNotFound { .. } => "TICKET_NOT_FOUND",
            ActivationError::TransientNetworkError { .. } => "TRANSIENT_NETWORK_ERROR",
            ActivationError::ToggleFailed { .. } => "TOGGLE_FAILED",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ActivationError::TransientNetworkError { .. })
    }

    /// Message shown to the operator at the door
    pub fn user_message(&self) -> String {
        match self {
            ActivationError::TicketNotFound { sno } => format!("Ticket '{}' not found", sno),
            ActivationError::TransientNetworkError { .. } => {
                "Could not reach the booking service, please try again".to_string()
            }
            ActivationError::ToggleFailed { message, .. } => {
                format!("Ticket status was not changed: {}", message)
            }
        }
    }
}
