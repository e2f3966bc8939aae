use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::events::models::EventStatus;

/// Event date as sent by clients: a full RFC 3339 timestamp or a bare
/// calendar day such as `2025-03-10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EventDateInput {
    Instant(DateTime<Utc>),
    /// Midnight of this day in the request's zone
    Day(NaiveDate),
}

impl EventDateInput {
    /// `None` when local midnight does not exist in `tz`
    pub fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            EventDateInput::Instant(instant) => Some(*instant),
            EventDateInput::Day(day) => tz
                .from_local_datetime(&day.and_time(NaiveTime::MIN))
                .earliest()
                .map(|local| local.with_timezone(&Utc)),
        }
    }
}

/// One event to classify
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClassifyEventDto {
    /// Caller-side identifier echoed back in batch responses
    #[serde(default)]
    pub id: Option<String>,
    pub date: EventDateInput,
    #[serde(default)]
    pub end_date: Option<EventDateInput>,
    /// Status stored by the backend
    pub status: EventStatus,
    /// Viewer's offset from UTC; the server's local zone is used when absent
    #[serde(default)]
    #[validate(range(
        min = -720,
        max = 840,
        message = "utc_offset_minutes must be between -720 and 840"
    ))]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClassifyEventsBatchDto {
    #[validate(length(min = 1, message = "At least one event is required"), nested)]
    pub events: Vec<ClassifyEventDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventStatusResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: EventStatus,
}
