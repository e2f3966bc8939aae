use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle label of an event
///
/// `Draft` is assigned by the backend. The other three are derived from the
/// event's dates relative to the viewer's calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EventStatus {
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "upcoming")]
    Upcoming,
    #[serde(alias = "ongoing")]
    Ongoing,
    #[serde(alias = "completed")]
    Completed,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "Draft"),
            EventStatus::Upcoming => write!(f, "Upcoming"),
            EventStatus::Ongoing => write!(f, "Ongoing"),
            EventStatus::Completed => write!(f, "Completed"),
        }
    }
}
