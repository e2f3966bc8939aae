use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use tokio::sync::Barrier;

use crate::features::activation::clients::TicketGateway;
use crate::features::activation::errors::GatewayError;
use crate::features::activation::models::Ticket;

/// Ticket with generated holder details
pub fn sample_ticket(sno: &str, is_activated: bool) -> Ticket {
    Ticket {
        sno: sno.to_string(),
        is_activated,
        event_id: Some("evt7".to_string()),
        event_name: Some("Spring Gala".to_string()),
        event_date: Some("2025-03-10".to_string()),
        event_time: Some("19:00".to_string()),
        user_name: Some(Name().fake()),
        email: Some(SafeEmail().fake()),
        qr_code_url: Some(format!("https://example.com/activate/{}", sno)),
        updated_at: Some(Utc::now()),
    }
}

/// Gateway that replays queued responses and records every call
#[derive(Default)]
pub struct ScriptedGateway {
    lookups: Mutex<VecDeque<Result<Ticket, GatewayError>>>,
    toggles: Mutex<VecDeque<Result<Ticket, GatewayError>>>,
    calls: Mutex<Vec<String>>,
    pub lookup_calls: AtomicUsize,
    pub toggle_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_lookup(self, response: Result<Ticket, GatewayError>) -> Self {
        self.lookups.lock().unwrap().push_back(response);
        self
    }

    pub fn on_toggle(self, response: Result<Ticket, GatewayError>) -> Self {
        self.toggles.lock().unwrap().push_back(response);
        self
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketGateway for ScriptedGateway {
    async fn find_by_serial(&self, sno: &str) -> Result<Ticket, GatewayError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(format!("lookup:{}", sno));
        self.lookups
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected lookup call")
    }

    async fn toggle_scan(&self, sno: &str) -> Result<Ticket, GatewayError> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(format!("toggle:{}", sno));
        self.toggles
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected toggle call")
    }
}

/// Stateful stand-in for the booking backend: toggles really flip
pub struct InMemoryBackend {
    tickets: Mutex<HashMap<String, Ticket>>,
    lookup_barrier: Option<Barrier>,
}

impl InMemoryBackend {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets.into_iter().map(|t| (t.sno.clone(), t)).collect()),
            lookup_barrier: None,
        }
    }

    /// Hold every lookup until `n` of them are in flight
    pub fn with_lookup_barrier(mut self, n: usize) -> Self {
        self.lookup_barrier = Some(Barrier::new(n));
        self
    }

    pub fn is_activated(&self, sno: &str) -> bool {
        self.tickets
            .lock()
            .unwrap()
            .get(sno)
            .map(|t| t.is_activated)
            .unwrap_or(false)
    }
}

#[async_trait]
impl TicketGateway for InMemoryBackend {
    async fn find_by_serial(&self, sno: &str) -> Result<Ticket, GatewayError> {
        let found = self.tickets.lock().unwrap().get(sno).cloned();

        // Read first, then wait: every lookup sees the state before any toggle
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }

        found.ok_or_else(|| GatewayError::Status {
            status: 404,
            message: "Booking not found".to_string(),
        })
    }

    async fn toggle_scan(&self, sno: &str) -> Result<Ticket, GatewayError> {
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets.get_mut(sno).ok_or_else(|| GatewayError::Status {
            status: 404,
            message: "Booking not found".to_string(),
        })?;
        ticket.is_activated = !ticket.is_activated;
        ticket.updated_at = Some(Utc::now());
        Ok(ticket.clone())
    }
}
