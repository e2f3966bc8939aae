use utoipa::{Modify, OpenApi};

use crate::features::activation::{
    dtos as activation_dtos, handlers as activation_handlers, models as activation_models,
    payload, services as activation_services,
};
use crate::features::events::{
    dtos as events_dtos, handlers as events_handlers, models as events_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Activation
        activation_handlers::activate_link,
        activation_handlers::scan_payload,
        activation_handlers::parse_scan_payload,
        activation_handlers::get_ticket,
        activation_handlers::list_recent,
        activation_handlers::get_recent,
        activation_handlers::invalidate_recent,
        activation_handlers::clear_recent,
        // Events
        events_handlers::classify_event,
        events_handlers::classify_events_batch,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Activation
            activation_models::Ticket,
            activation_models::ScanTransition,
            payload::PayloadForm,
            payload::ParsedPayload,
            activation_dtos::ScanRequestDto,
            activation_dtos::ScanResultDto,
            activation_services::CachedTicketView,
            ApiResponse<activation_dtos::ScanResultDto>,
            ApiResponse<activation_models::Ticket>,
            ApiResponse<payload::ParsedPayload>,
            ApiResponse<activation_services::CachedTicketView>,
            ApiResponse<Vec<activation_services::CachedTicketView>>,
            // Events
            events_models::EventStatus,
            events_dtos::EventDateInput,
            events_dtos::ClassifyEventDto,
            events_dtos::ClassifyEventsBatchDto,
            events_dtos::EventStatusResponseDto,
            ApiResponse<events_dtos::EventStatusResponseDto>,
            ApiResponse<Vec<events_dtos::EventStatusResponseDto>>,
        )
    ),
    tags(
        (name = "activation", description = "Ticket scanning and activation at the venue entrance"),
        (name = "events", description = "Event status derived from event dates"),
    ),
    info(
        title = "Eventdesk API",
        version = "0.1.0",
        description = "API documentation for Eventdesk",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
