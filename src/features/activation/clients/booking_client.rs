use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::BackendConfig;
use crate::features::activation::errors::GatewayError;
use crate::features::activation::models::Ticket;

/// Longest backend error body echoed back to callers
const MAX_ERROR_MESSAGE_LEN: usize = 200;

/// The two backend operations the activation protocol consumes
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// `GET /api/bookings/sno/{sno}`
    async fn find_by_serial(&self, sno: &str) -> Result<Ticket, GatewayError>;

    /// `POST /api/bookings/sno/{sno}/scan`, flips `is_activated`
    async fn toggle_scan(&self, sno: &str) -> Result<Ticket, GatewayError>;
}

/// Body of a successful scan call
#[derive(Debug, Deserialize)]
struct ScanResponse {
    booking: Ticket,
}

/// Error shapes the backend is known to produce
#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// reqwest client for the booking REST backend
pub struct BookingApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BookingApiClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("eventdesk-core/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ticket_url(&self, sno: &str) -> String {
        format!(
            "{}/api/bookings/sno/{}",
            self.base_url,
            urlencoding::encode(sno)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = self.authorize(request).send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

#[async_trait]
impl TicketGateway for BookingApiClient {
    async fn find_by_serial(&self, sno: &str) -> Result<Ticket, GatewayError> {
        let url = self.ticket_url(sno);
        tracing::debug!("Looking up ticket: {}", url);

        let response = self.send(self.http_client.get(&url)).await?;

        response.json::<Ticket>().await.map_err(|e| {
            tracing::error!("Failed to parse ticket lookup response: {:?}", e);
            GatewayError::Decode(e.to_string())
        })
    }

    async fn toggle_scan(&self, sno: &str) -> Result<Ticket, GatewayError> {
        let url = format!("{}/scan", self.ticket_url(sno));
        tracing::debug!("Toggling ticket activation: {}", url);

        let response = self.send(self.http_client.post(&url)).await?;

        let body = response.json::<ScanResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse scan response: {:?}", e);
            GatewayError::Decode(e.to_string())
        })?;

        Ok(body.booking)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    tracing::warn!("Booking backend request failed: {:?}", e);
    if e.is_timeout() {
        GatewayError::Transport(format!("request timed out: {}", e))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Prefer the backend's own `message`/`error` field, fall back to the raw body
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<BackendErrorResponse>(body) {
        if let Some(msg) = parsed.message.or(parsed.error).filter(|m| !m.is_empty()) {
            return msg;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status);
    }

    trimmed.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}
