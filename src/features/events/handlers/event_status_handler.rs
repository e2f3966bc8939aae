use axum::Json;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::events::dtos::{
    ClassifyEventDto, ClassifyEventsBatchDto, EventDateInput, EventStatusResponseDto,
};
use crate::features::events::models::EventStatus;
use crate::features::events::services::classify;
use crate::shared::constants::MAX_STATUS_BATCH_SIZE;
use crate::shared::types::{ApiResponse, Meta};

fn resolve_date<Tz: TimeZone>(input: &EventDateInput, tz: &Tz, field: &str) -> Result<DateTime<Utc>> {
    input.resolve(tz).ok_or_else(|| {
        AppError::Validation(format!("{} has no local midnight in the requested zone", field))
    })
}

fn classify_in<Tz: TimeZone>(dto: &ClassifyEventDto, now: DateTime<Utc>, tz: &Tz) -> Result<EventStatus> {
    let date = resolve_date(&dto.date, tz, "date")?;
    let end_date = dto
        .end_date
        .as_ref()
        .map(|end| resolve_date(end, tz, "end_date"))
        .transpose()?;
    Ok(classify(&now.with_timezone(tz), date, end_date, dto.status))
}

/// Classify in the caller's zone when it told us its offset, else in ours
fn classify_at(dto: &ClassifyEventDto, now: DateTime<Utc>) -> Result<EventStatus> {
    match dto.utc_offset_minutes {
        Some(minutes) => {
            let tz = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
                AppError::Validation(format!("Invalid utc_offset_minutes: {}", minutes))
            })?;
            classify_in(dto, now, &tz)
        }
        None => classify_in(dto, now, &Local),
    }
}

/// Derive the display status of one event
#[utoipa::path(
    post,
    path = "/api/events/status",
    request_body = ClassifyEventDto,
    responses(
        (status = 200, description = "Derived status", body = ApiResponse<EventStatusResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "events"
)]
pub async fn classify_event(
    AppJson(dto): AppJson<ClassifyEventDto>,
) -> Result<Json<ApiResponse<EventStatusResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let status = classify_at(&dto, Utc::now())?;
    Ok(Json(ApiResponse::success(
        Some(EventStatusResponseDto { id: dto.id, status }),
        None,
        None,
    )))
}

/// Derive the display status of several events against the same clock reading
#[utoipa::path(
    post,
    path = "/api/events/status/batch",
    request_body = ClassifyEventsBatchDto,
    responses(
        (status = 200, description = "Derived statuses, in request order", body = ApiResponse<Vec<EventStatusResponseDto>>),
        (status = 400, description = "Validation error")
    ),
    tag = "events"
)]
pub async fn classify_events_batch(
    AppJson(dto): AppJson<ClassifyEventsBatchDto>,
) -> Result<Json<ApiResponse<Vec<EventStatusResponseDto>>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if dto.events.len() > MAX_STATUS_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "At most {} events can be classified per request",
            MAX_STATUS_BATCH_SIZE
        )));
    }

    let now = Utc::now();
    let statuses = dto
        .events
        .into_iter()
        .map(|event| {
            classify_at(&event, now).map(|status| EventStatusResponseDto {
                id: event.id,
                status,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let meta = Meta {
        total: statuses.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(statuses), None, Some(meta))))
}
