use chrono::{DateTime, TimeZone, Utc};

use crate::features::events::models::EventStatus;

/// Derive an event's status from its dates.
///
/// Day comparisons happen in `now`'s time zone, so "today" is the viewer's
/// local calendar day rather than the UTC day. Rules, first match wins:
///
/// 1. `Draft` from the backend is returned unchanged.
/// 2. The event starts today → `Ongoing`, whatever the time of day.
/// 3. The event starts on a later day → `Upcoming`.
/// 4. It started on an earlier day and `end_date` has not passed yet → `Ongoing`.
/// 5. Otherwise → `Completed`.
pub fn classify<Tz: TimeZone>(
    now: &DateTime<Tz>,
    date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    backend_status: EventStatus,
) -> EventStatus {
    if backend_status == EventStatus::Draft {
        return EventStatus::Draft;
    }

    let tz = now.timezone();
    let today = now.date_naive();
    let start_day = date.with_timezone(&tz).date_naive();

    if start_day == today {
        return EventStatus::Ongoing;
    }

    if start_day > today {
        return EventStatus::Upcoming;
    }

    match end_date {
        Some(end) if now.with_timezone(&Utc) <= end => EventStatus::Ongoing,
        _ => EventStatus::Completed,
    }
}
