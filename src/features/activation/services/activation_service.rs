use std::sync::Arc;

use crate::features::activation::clients::TicketGateway;
use crate::features::activation::errors::ActivationError;
use crate::features::activation::models::{ScanOutcome, Ticket};

/// Ticket activation protocol: look up by serial, then toggle.
///
/// Holds no ticket state. Every value it returns comes from a backend
/// response, so concurrent scans from other devices are reported as the
/// backend resolved them.
pub struct ActivationService {
    gateway: Arc<dyn TicketGateway>,
}

impl ActivationService {
    pub fn new(gateway: Arc<dyn TicketGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch the current record without changing it
    pub async fn resolve(&self, sno: &str) -> Result<Ticket, ActivationError> {
        if sno.trim().is_empty() {
            return Err(ActivationError::TicketNotFound {
                sno: sno.to_string(),
            });
        }

        let ticket = self
            .gateway
            .find_by_serial(sno)
            .await
            .map_err(|e| ActivationError::from_lookup(sno, e))?;

        tracing::debug!(
            "Resolved ticket: sno={}, is_activated={}",
            ticket.sno,
            ticket.is_activated
        );

        Ok(ticket)
    }

    /// One user-initiated scan. The toggle is only sent after the lookup
    /// confirmed the ticket exists, and never retried.
    pub async fn resolve_and_toggle(&self, sno: &str) -> Result<ScanOutcome, ActivationError> {
        let current = self.resolve(sno).await?;

        let updated = self
            .gateway
            .toggle_scan(sno)
            .await
            .map_err(|e| ActivationError::from_toggle(sno, e))?;

        if updated.sno != current.sno {
            tracing::warn!(
                "Scan response serial '{}' differs from looked up serial '{}'",
                updated.sno,
                current.sno
            );
        }

        let outcome = ScanOutcome::new(updated, current.is_activated);

        if outcome.concurrent_scan_suspected() {
            tracing::warn!(
                "Ticket {} was scanned elsewhere concurrently, backend now reports is_activated={}",
                sno,
                outcome.ticket.is_activated
            );
        }

        tracing::info!("Ticket {} {}", sno, outcome.transition);

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use tokio_test::{assert_err, assert_ok};

    use crate::features::activation::errors::{GatewayError, ScanStage};
    use crate::features::activation::models::ScanTransition;
    use crate::shared::test_helpers::{sample_ticket, InMemoryBackend, ScriptedGateway};

    fn service(gateway: Arc<dyn TicketGateway>) -> ActivationService {
        ActivationService::new(gateway)
    }

    #[tokio::test]
    async fn test_scenario_a_activates_ticket() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_lookup(Ok(sample_ticket("T-001", false)))
                .on_toggle(Ok(sample_ticket("T-001", true))),
        );

        let outcome = service(gateway.clone())
            .resolve_and_toggle("T-001")
            .await
            .unwrap();

        assert!(outcome.ticket.is_activated);
        assert_eq!(outcome.transition, ScanTransition::Activated);
        assert!(!outcome.previously_activated);
        assert_eq!(gateway.lookup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.call_log(), vec!["lookup:T-001", "toggle:T-001"]);
    }

    #[tokio::test]
    async fn test_scenario_b_not_found_never_toggles() {
        let gateway = Arc::new(ScriptedGateway::new().on_lookup(Err(GatewayError::Status {
            status: 404,
            message: "Booking not found".to_string(),
        })));

        let err = service(gateway.clone())
            .resolve_and_toggle("T-999")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ActivationError::TicketNotFound {
                sno: "T-999".to_string()
            }
        );
        assert_eq!(gateway.lookup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_transport_failure_never_toggles() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_lookup(Err(GatewayError::Transport("connection reset".to_string()))),
        );

        let err = service(gateway.clone())
            .resolve_and_toggle("T-001")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ActivationError::TransientNetworkError {
                stage: ScanStage::Lookup,
                ..
            }
        ));
        assert!(err.is_retryable());
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_transient_not_not_found() {
        let gateway = Arc::new(ScriptedGateway::new().on_lookup(Err(GatewayError::Status {
            status: 503,
            message: "maintenance".to_string(),
        })));

        let err = service(gateway.clone())
            .resolve_and_toggle("T-001")
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TRANSIENT_NETWORK_ERROR");
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_toggle_rejection_is_toggle_failed() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_lookup(Ok(sample_ticket("T-001", false)))
                .on_toggle(Err(GatewayError::Status {
                    status: 422,
                    message: "Event has been cancelled".to_string(),
                })),
        );

        let err = service(gateway.clone())
            .resolve_and_toggle("T-001")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ActivationError::ToggleFailed {
                sno: "T-001".to_string(),
                status: Some(422),
                message: "Event has been cancelled".to_string(),
            }
        );
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_toggle_transport_failure_is_transient() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_lookup(Ok(sample_ticket("T-001", false)))
                .on_toggle(Err(GatewayError::Transport("timed out".to_string()))),
        );

        let err = service(gateway).resolve_and_toggle("T-001").await.unwrap_err();

        assert!(matches!(
            err,
            ActivationError::TransientNetworkError {
                stage: ScanStage::Toggle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_displayed_state_is_taken_from_toggle_response() {
        // lookup says inactive, but the backend answers "still inactive"
        // because another device flipped it in between
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_lookup(Ok(sample_ticket("T-001", false)))
                .on_toggle(Ok(sample_ticket("T-001", false))),
        );

        let outcome = service(gateway).resolve_and_toggle("T-001").await.unwrap();

        assert!(!outcome.ticket.is_activated);
        assert_eq!(outcome.transition, ScanTransition::Deactivated);
        assert!(outcome.concurrent_scan_suspected());
    }

    #[tokio::test]
    async fn test_blank_serial_makes_no_calls() {
        let gateway = Arc::new(ScriptedGateway::new());

        let err = assert_err!(service(gateway.clone()).resolve_and_toggle("   ").await);

        assert_eq!(err.code(), "TICKET_NOT_FOUND");
        assert!(gateway.call_log().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_does_not_toggle() {
        let gateway = Arc::new(ScriptedGateway::new().on_lookup(Ok(sample_ticket("T-5", true))));

        let ticket = assert_ok!(service(gateway.clone()).resolve("T-5").await);

        assert!(ticket.is_activated);
        assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_scans_flip_each_time() {
        let backend = Arc::new(InMemoryBackend::with_tickets(vec![sample_ticket(
            "T-010", false,
        )]));
        let service = service(backend.clone());

        let first = service.resolve_and_toggle("T-010").await.unwrap();
        let second = service.resolve_and_toggle("T-010").await.unwrap();

        assert_eq!(first.transition, ScanTransition::Activated);
        assert_eq!(second.transition, ScanTransition::Deactivated);
        assert!(!backend.is_activated("T-010"));
    }

    #[tokio::test]
    async fn test_concurrent_scans_report_backend_order() {
        let backend = Arc::new(
            InMemoryBackend::with_tickets(vec![sample_ticket("T-020", false)])
                .with_lookup_barrier(2),
        );
        let device_a = service(backend.clone());
        let device_b = service(backend.clone());

        let (a, b) = tokio::join!(
            device_a.resolve_and_toggle("T-020"),
            device_b.resolve_and_toggle("T-020")
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        // both lookups saw "inactive", each toggle flipped once
        assert!(!a.previously_activated);
        assert!(!b.previously_activated);
        assert_ne!(a.ticket.is_activated, b.ticket.is_activated);
        assert_eq!(
            [a.concurrent_scan_suspected(), b.concurrent_scan_suspected()]
                .iter()
                .filter(|s| **s)
                .count(),
            1
        );
        assert!(!backend.is_activated("T-020"));
    }
}
