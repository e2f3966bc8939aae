use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::activation::dtos::{ParsePayloadQuery, ScanRequestDto, ScanResultDto};
use crate::features::activation::models::Ticket;
use crate::features::activation::payload::{parse_payload, ParsedPayload};
use crate::features::activation::services::{ActivationService, CachedTicketView, ScanViewCache};
use crate::shared::types::{ApiResponse, Meta};

/// State for scan handlers
#[derive(Clone)]
pub struct ScanState {
    pub activation_service: Arc<ActivationService>,
    pub scan_cache: Arc<ScanViewCache>,
}

impl ScanState {
    /// Run one scan and remember the authoritative result.
    ///
    /// The cache is only touched after the backend confirmed the toggle, so a
    /// dropped request or a failure leaves the previous view intact.
    async fn scan(&self, sno: &str) -> Result<ScanResultDto> {
        let outcome = self.activation_service.resolve_and_toggle(sno).await?;
        self.scan_cache.record(outcome.ticket.clone()).await;
        Ok(outcome.into())
    }
}

fn scan_message(result: &ScanResultDto) -> String {
    format!("Ticket {} {}", result.ticket.sno, result.transition)
}

/// Activate or deactivate a ticket through its shareable link
#[utoipa::path(
    get,
    path = "/activate/{sno}",
    params(
        ("sno" = String, Path, description = "Ticket serial number")
    ),
    responses(
        (status = 200, description = "Ticket toggled", body = ApiResponse<ScanResultDto>),
        (status = 404, description = "Ticket not found"),
        (status = 502, description = "Backend refused the toggle"),
        (status = 503, description = "Backend unreachable, retry allowed")
    ),
    tag = "activation"
)]
pub async fn activate_link(
    State(state): State<ScanState>,
    Path(sno): Path<String>,
) -> Result<Json<ApiResponse<ScanResultDto>>> {
    let result = state.scan(&sno).await?;
    let message = scan_message(&result);
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

/// Scan a raw QR payload or manually entered serial
#[utoipa::path(
    post,
    path = "/api/scans",
    request_body = ScanRequestDto,
    responses(
        (status = 200, description = "Ticket toggled", body = ApiResponse<ScanResultDto>),
        (status = 400, description = "No serial number in payload"),
        (status = 404, description = "Ticket not found"),
        (status = 502, description = "Backend refused the toggle"),
        (status = 503, description = "Backend unreachable, retry allowed")
    ),
    tag = "activation"
)]
pub async fn scan_payload(
    State(state): State<ScanState>,
    AppJson(dto): AppJson<ScanRequestDto>,
) -> Result<Json<ApiResponse<ScanResultDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let parsed = parse_payload(&dto.payload)
        .ok_or_else(|| AppError::BadRequest("No serial number found in payload".to_string()))?;
    tracing::debug!("Parsed scan payload as {} form: {}", parsed.form, parsed.sno);

    let result = state.scan(&parsed.sno).await?.with_form(parsed.form);
    let message = scan_message(&result);
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

/// Preview which serial a payload resolves to, without contacting the backend
#[utoipa::path(
    get,
    path = "/api/scans/parse",
    params(ParsePayloadQuery),
    responses(
        (status = 200, description = "Payload parsed", body = ApiResponse<ParsedPayload>),
        (status = 400, description = "No serial number in payload")
    ),
    tag = "activation"
)]
pub async fn parse_scan_payload(
    Query(query): Query<ParsePayloadQuery>,
) -> Result<Json<ApiResponse<ParsedPayload>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let parsed = parse_payload(&query.payload)
        .ok_or_else(|| AppError::BadRequest("No serial number found in payload".to_string()))?;
    Ok(Json(ApiResponse::success(Some(parsed), None, None)))
}

/// Look up a ticket by serial without toggling it
#[utoipa::path(
    get,
    path = "/api/tickets/{sno}",
    params(
        ("sno" = String, Path, description = "Ticket serial number")
    ),
    responses(
        (status = 200, description = "Ticket found", body = ApiResponse<Ticket>),
        (status = 404, description = "Ticket not found"),
        (status = 503, description = "Backend unreachable, retry allowed")
    ),
    tag = "activation"
)]
pub async fn get_ticket(
    State(state): State<ScanState>,
    Path(sno): Path<String>,
) -> Result<Json<ApiResponse<Ticket>>> {
    let ticket = state.activation_service.resolve(&sno).await?;
    state.scan_cache.record(ticket.clone()).await;
    Ok(Json(ApiResponse::success(Some(ticket), None, None)))
}

/// List recently seen tickets, newest first
#[utoipa::path(
    get,
    path = "/api/scans/recent",
    responses(
        (status = 200, description = "Recently seen tickets", body = ApiResponse<Vec<CachedTicketView>>),
    ),
    tag = "activation"
)]
pub async fn list_recent(
    State(state): State<ScanState>,
) -> Result<Json<ApiResponse<Vec<CachedTicketView>>>> {
    let views = state.scan_cache.list().await;
    let meta = Meta {
        total: views.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(views), None, Some(meta))))
}

/// Last record seen for a serial
#[utoipa::path(
    get,
    path = "/api/scans/recent/{sno}",
    params(
        ("sno" = String, Path, description = "Ticket serial number")
    ),
    responses(
        (status = 200, description = "Cached view found", body = ApiResponse<CachedTicketView>),
        (status = 404, description = "Serial not in the recent list")
    ),
    tag = "activation"
)]
pub async fn get_recent(
    State(state): State<ScanState>,
    Path(sno): Path<String>,
) -> Result<Json<ApiResponse<CachedTicketView>>> {
    let view = state
        .scan_cache
        .get(&sno)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Ticket '{}' has not been seen recently", sno)))?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Drop one serial from the recent list
#[utoipa::path(
    delete,
    path = "/api/scans/recent/{sno}",
    params(
        ("sno" = String, Path, description = "Ticket serial number")
    ),
    responses(
        (status = 200, description = "Entry invalidated"),
        (status = 404, description = "Serial not in the recent list")
    ),
    tag = "activation"
)]
pub async fn invalidate_recent(
    State(state): State<ScanState>,
    Path(sno): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.scan_cache.invalidate(&sno).await {
        return Err(AppError::NotFound(format!(
            "Ticket '{}' has not been seen recently",
            sno
        )));
    }
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Ticket {} removed from recent scans", sno)),
        None,
    )))
}

/// Empty the recent list
#[utoipa::path(
    delete,
    path = "/api/scans/recent",
    responses(
        (status = 200, description = "Recent list cleared"),
    ),
    tag = "activation"
)]
pub async fn clear_recent(State(state): State<ScanState>) -> Result<Json<ApiResponse<()>>> {
    state.scan_cache.clear().await;
    Ok(Json(ApiResponse::success(
        None,
        Some("Recent scans cleared".to_string()),
        None,
    )))
}
