use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use taxitera_core::booking::{Booking, BookingStatus};
use taxitera_core::notification::{NotificationIntent, OutboxEntry, OutboxStatus};
use taxitera_core::repository::{BookingRepository, NotificationOutbox, RepoError};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store backing tests and local runs. Same trait surface as the
/// Postgres store; atomicity comes from holding both locks across a write.
pub struct MemoryStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
    outbox: RwLock<Vec<OutboxEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the outbox, oldest first.
    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.outbox.read().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: &Booking, intent: &NotificationIntent) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().await;
        let mut outbox = self.outbox.write().await;
        bookings.insert(booking.id, booking.clone());
        outbox.push(OutboxEntry::from_intent(intent));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        booking: &Booking,
        intent: Option<&NotificationIntent>,
    ) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().await;
        let mut outbox = self.outbox.write().await;
        bookings.insert(booking.id, booking.clone());
        if let Some(intent) = intent {
            outbox.push(OutboxEntry::from_intent(intent));
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>, RepoError> {
        let mut result: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, RepoError> {
        let mut result: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl NotificationOutbox for MemoryStore {
    async fn fetch_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, RepoError> {
        Ok(self
            .outbox
            .read()
            .await
            .iter()
            .filter(|e| e.status == OutboxStatus::Pending)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_sent(&self, id: Uuid) -> Result<(), RepoError> {
        let mut outbox = self.outbox.write().await;
        if let Some(entry) = outbox.iter_mut().find(|e| e.id == id) {
            entry.status = OutboxStatus::Sent;
            entry.attempts += 1;
            entry.dispatched_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, max_attempts: u32) -> Result<(), RepoError> {
        let mut outbox = self.outbox.write().await;
        if let Some(entry) = outbox.iter_mut().find(|e| e.id == id) {
            entry.attempts += 1;
            if entry.attempts >= max_attempts {
                entry.status = OutboxStatus::Failed;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use taxitera_shared::VehicleClass;

    fn booking(owner: &str) -> Booking {
        Booking::new(
            owner.to_string(),
            "Piassa - Arat Kilo".to_string(),
            VehicleClass::Bus,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            vec!["Hana".to_string()],
            15.0,
        )
    }

    #[tokio::test]
    async fn pending_entries_retry_until_attempt_cap() {
        let store = MemoryStore::new();
        let b = booking("user-1");
        let intent = NotificationIntent::booking_confirmed(&b);
        store.insert(&b, &intent).await.unwrap();

        let pending = store.fetch_pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        let id = pending[0].id;

        store.mark_failed(id, 3).await.unwrap();
        assert_eq!(store.fetch_pending(10).await.unwrap().len(), 1);

        store.mark_failed(id, 3).await.unwrap();
        store.mark_failed(id, 3).await.unwrap();
        assert!(store.fetch_pending(10).await.unwrap().is_empty());
        assert_eq!(store.entries().await[0].status, OutboxStatus::Failed);
    }

    #[tokio::test]
    async fn mark_sent_records_dispatch_time() {
        let store = MemoryStore::new();
        let b = booking("user-1");
        let intent = NotificationIntent::booking_confirmed(&b);
        store.insert(&b, &intent).await.unwrap();

        let id = store.fetch_pending(1).await.unwrap()[0].id;
        store.mark_sent(id).await.unwrap();

        let entries = store.entries().await;
        assert_eq!(entries[0].status, OutboxStatus::Sent);
        assert!(entries[0].dispatched_at.is_some());
    }
}
