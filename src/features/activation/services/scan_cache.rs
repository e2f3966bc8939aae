use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::features::activation::models::Ticket;

/// Last authoritative record seen for a serial
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CachedTicketView {
    pub ticket: Ticket,
    pub recorded_at: DateTime<Utc>,
}

/// Recently scanned tickets, for display only.
///
/// Written exclusively with records returned by the backend and never on a
/// failed scan. Entries leave through explicit invalidation or, once
/// `capacity` is reached, oldest first. The activation protocol never reads
/// from here.
pub struct ScanViewCache {
    entries: RwLock<HashMap<String, CachedTicketView>>,
    capacity: usize,
}

impl ScanViewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Store `ticket` unless the cached record for the same serial is newer.
    ///
    /// Responses from racing scans can arrive out of backend order; the
    /// backend's `updated_at` decides which one stays. Records without a
    /// timestamp always replace the cached view.
    pub async fn record(&self, ticket: Ticket) {
        let mut entries = self.entries.write().await;

        if let Some(cached) = entries.get(&ticket.sno) {
            if let (Some(incoming), Some(current)) =
                (ticket.updated_at, cached.ticket.updated_at)
            {
                if incoming < current {
                    tracing::debug!(
                        "Ignoring stale record for {} (updated_at {} < {})",
                        ticket.sno,
                        incoming,
                        current
                    );
                    return;
                }
            }
        }

        if !entries.contains_key(&ticket.sno) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, view)| view.recorded_at)
                .map(|(sno, _)| sno.clone());
            if let Some(sno) = oldest {
                tracing::debug!("Scan cache full, evicting {}", sno);
                entries.remove(&sno);
            }
        }

        entries.insert(
            ticket.sno.clone(),
            CachedTicketView {
                ticket,
                recorded_at: Utc::now(),
            },
        );
    }

    pub async fn get(&self, sno: &str) -> Option<CachedTicketView> {
        self.entries.read().await.get(sno).cloned()
    }

    /// Newest first
    pub async fn list(&self) -> Vec<CachedTicketView> {
        let mut views: Vec<CachedTicketView> =
            self.entries.read().await.values().cloned().collect();
        views.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        views
    }

    /// Returns whether an entry was removed
    pub async fn invalidate(&self, sno: &str) -> bool {
        self.entries.write().await.remove(sno).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_ticket;

    #[tokio::test]
    async fn test_record_replaces_previous_view() {
        let cache = ScanViewCache::new(10);
        cache.record(sample_ticket("T-1", false)).await;
        cache.record(sample_ticket("T-1", true)).await;

        assert_eq!(cache.list().await.len(), 1);
        assert!(cache.get("T-1").await.unwrap().ticket.is_activated);
    }

    #[tokio::test]
    async fn test_older_record_does_not_replace_newer() {
        let cache = ScanViewCache::new(10);

        let newer = sample_ticket("T-1", true);
        let mut older = sample_ticket("T-1", false);
        older.updated_at = newer.updated_at.map(|at| at - chrono::Duration::seconds(5));

        cache.record(newer).await;
        cache.record(older).await;

        assert!(cache.get("T-1").await.unwrap().ticket.is_activated);
    }

    #[tokio::test]
    async fn test_record_without_timestamp_replaces_view() {
        let cache = ScanViewCache::new(10);
        cache.record(sample_ticket("T-1", true)).await;

        let mut untimed = sample_ticket("T-1", false);
        untimed.updated_at = None;
        cache.record(untimed).await;

        assert!(!cache.get("T-1").await.unwrap().ticket.is_activated);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = ScanViewCache::new(10);
        cache.record(sample_ticket("T-1", true)).await;

        assert!(cache.invalidate("T-1").await);
        assert!(!cache.invalidate("T-1").await);
        assert!(cache.get("T-1").await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = ScanViewCache::new(2);
        cache.record(sample_ticket("T-1", true)).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        cache.record(sample_ticket("T-2", true)).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        cache.record(sample_ticket("T-3", true)).await;

        assert_eq!(cache.list().await.len(), 2);
        assert!(cache.get("T-1").await.is_none());

        let listed: Vec<String> = cache
            .list()
            .await
            .into_iter()
            .map(|v| v.ticket.sno)
            .collect();
        assert_eq!(listed, vec!["T-3".to_string(), "T-2".to_string()]);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = ScanViewCache::new(10);
        cache.record(sample_ticket("T-1", true)).await;
        cache.record(sample_ticket("T-2", false)).await;
        cache.clear().await;
        assert_eq!(cache.list().await.len(), 0);
    }
}
