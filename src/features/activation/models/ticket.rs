use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Ticket record as owned by the booking backend
///
/// Descriptive fields are a snapshot copied at booking time. Only
/// `is_activated` changes, and only through the backend's scan endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub sno: String,
    #[serde(alias = "isActivated")]
    pub is_activated: bool,
    #[serde(default, alias = "eventId", deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default, alias = "eventName")]
    pub event_name: Option<String>,
    #[serde(default, alias = "eventDate")]
    pub event_date: Option<String>,
    #[serde(default, alias = "eventTime")]
    pub event_time: Option<String>,
    #[serde(default, alias = "userName")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "qrCodeUrl")]
    pub qr_code_url: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Direction of a scan, derived from the state the backend reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanTransition {
    Activated,
    Deactivated,
}

impl ScanTransition {
    pub fn from_state(is_activated: bool) -> Self {
        if is_activated {
            ScanTransition::Activated
        } else {
            ScanTransition::Deactivated
        }
    }
}

impl std::fmt::Display for ScanTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanTransition::Activated => write!(f, "activated"),
            ScanTransition::Deactivated => write!(f, "deactivated"),
        }
    }
}

/// Result of a completed scan
///
/// `ticket` is the record echoed by the toggle call. `transition` and
/// `previously_activated` are labels for display, not state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub ticket: Ticket,
    pub transition: ScanTransition,
    pub previously_activated: bool,
}

impl ScanOutcome {
    pub fn new(ticket: Ticket, previously_activated: bool) -> Self {
        let transition = ScanTransition::from_state(ticket.is_activated);
        Self {
            ticket,
            transition,
            previously_activated,
        }
    }

    /// True when the backend reports the same state the lookup saw, which
    /// means another device flipped the ticket between our two calls.
    pub fn concurrent_scan_suspected(&self) -> bool {
        self.previously_activated == self.ticket.is_activated
    }
}

/// Legacy records store ids as numbers, newer ones as strings
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_deserializes_snake_case() {
        let json = serde_json::json!({
            "sno": "T-001",
            "is_activated": false,
            "event_id": "evt7",
            "event_name": "Spring Gala",
            "event_date": "2025-03-10",
            "event_time": "19:00",
            "user_name": "Jane Doe",
            "email": "jane@example.com",
            "qr_code_url": "https://example.com/activate/T-001",
            "updated_at": "2025-03-01T10:00:00Z",
            "_id": "65f0c0ffee"
        });

        let ticket: Ticket = serde_json::from_value(json).unwrap();
        assert_eq!(ticket.sno, "T-001");
        assert!(!ticket.is_activated);
        assert_eq!(ticket.event_id.as_deref(), Some("evt7"));
        assert_eq!(ticket.user_name.as_deref(), Some("Jane Doe"));
        assert!(ticket.updated_at.is_some());
    }

    #[test]
    fn test_ticket_accepts_legacy_camel_case_and_numeric_ids() {
        let json = serde_json::json!({
            "sno": "T-002",
            "isActivated": true,
            "eventId": 42,
            "eventName": "Legacy Night",
            "qrCodeUrl": "evt42:T-002:Sam"
        });

        let ticket: Ticket = serde_json::from_value(json).unwrap();
        assert!(ticket.is_activated);
        assert_eq!(ticket.event_id.as_deref(), Some("42"));
        assert_eq!(ticket.qr_code_url.as_deref(), Some("evt42:T-002:Sam"));
        assert_eq!(ticket.email, None);
    }

    #[test]
    fn test_ticket_requires_activation_flag() {
        let json = serde_json::json!({ "sno": "T-003" });
        assert!(serde_json::from_value::<Ticket>(json).is_err());
    }

    #[test]
    fn test_scan_outcome_labels_follow_returned_state() {
        let ticket = Ticket {
            sno: "T-004".to_string(),
            is_activated: true,
            event_id: None,
            event_name: None,
            event_date: None,
            event_time: None,
            user_name: None,
            email: None,
            qr_code_url: None,
            updated_at: None,
        };

        let outcome = ScanOutcome::new(ticket.clone(), false);
        assert_eq!(outcome.transition, ScanTransition::Activated);
        assert!(!outcome.concurrent_scan_suspected());

        // lookup saw "activated" and the toggle still returned "activated"
        let raced = ScanOutcome::new(ticket, true);
        assert_eq!(raced.transition, ScanTransition::Activated);
        assert!(raced.concurrent_scan_suspected());
    }
}
