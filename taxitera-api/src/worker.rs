use std::sync::Arc;

use async_trait::async_trait;
use taxitera_core::notification::OutboxEntry;
use taxitera_core::repository::{NotificationDispatcher, NotificationOutbox, RepoError};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

/// Dispatcher that records deliveries in the log. Stands in for the real
/// transport (email/SMS), which is an external collaborator.
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, entry: &OutboxEntry) -> Result<(), RepoError> {
        info!(
            "Notification {} to {} for booking {}: {}",
            entry.kind.as_str(),
            entry.recipient,
            entry.booking_id,
            entry.payload
        );
        Ok(())
    }
}

/// Poll the outbox and hand pending entries to the dispatcher. Dispatch
/// failures are recorded and retried on later polls, never surfaced to the
/// booking path.
pub async fn start_outbox_worker(
    outbox: Arc<dyn NotificationOutbox>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    poll_interval: Duration,
    batch_size: u32,
    max_attempts: u32,
) {
    info!("Notification worker started, polling outbox...");

    loop {
        sleep(poll_interval).await;
        if let Err(e) = drain_once(&*outbox, &*dispatcher, batch_size, max_attempts).await {
            error!("Outbox poll failed: {}", e);
        }
    }
}

/// One poll cycle. Returns how many entries were picked up.
pub async fn drain_once(
    outbox: &dyn NotificationOutbox,
    dispatcher: &dyn NotificationDispatcher,
    batch_size: u32,
    max_attempts: u32,
) -> Result<usize, RepoError> {
    let pending = outbox.fetch_pending(batch_size).await?;
    let count = pending.len();

    for entry in pending {
        match dispatcher.dispatch(&entry).await {
            Ok(()) => outbox.mark_sent(entry.id).await?,
            Err(e) => {
                warn!("Notification dispatch failed for {}: {}", entry.id, e);
                outbox.mark_failed(entry.id, max_attempts).await?;
            }
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxitera_booking::MemoryStore;
    use taxitera_core::booking::{Booking, CreateBooking};
    use taxitera_core::notification::{NotificationIntent, OutboxStatus};
    use taxitera_core::repository::BookingRepository;
    use taxitera_shared::VehicleClass;

    struct FailingDispatcher;

    #[async_trait]
    impl NotificationDispatcher for FailingDispatcher {
        async fn dispatch(&self, _entry: &OutboxEntry) -> Result<(), RepoError> {
            Err("smtp unreachable".into())
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let booking = Booking::new(
            "user-1".to_string(),
            "Piassa - Meskel Square".to_string(),
            VehicleClass::Minibus,
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            chrono::NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            vec!["Abel".to_string()],
            23.0,
        );
        let intent = NotificationIntent::booking_confirmed(&booking);
        store.insert(&booking, &intent).await.unwrap();
        store
    }

    #[tokio::test]
    async fn drain_marks_dispatched_entries_sent() {
        let store = seeded_store().await;

        let picked = drain_once(&store, &LogDispatcher, 10, 3).await.unwrap();
        assert_eq!(picked, 1);
        assert_eq!(store.entries().await[0].status, OutboxStatus::Sent);

        // Nothing left on the next cycle.
        let picked = drain_once(&store, &LogDispatcher, 10, 3).await.unwrap();
        assert_eq!(picked, 0);
    }

    #[tokio::test]
    async fn failed_dispatch_retries_then_gives_up() {
        let store = seeded_store().await;

        drain_once(&store, &FailingDispatcher, 10, 2).await.unwrap();
        assert_eq!(store.entries().await[0].status, OutboxStatus::Pending);
        assert_eq!(store.entries().await[0].attempts, 1);

        drain_once(&store, &FailingDispatcher, 10, 2).await.unwrap();
        assert_eq!(store.entries().await[0].status, OutboxStatus::Failed);

        // Failed entries are no longer picked up.
        let picked = drain_once(&store, &FailingDispatcher, 10, 2).await.unwrap();
        assert_eq!(picked, 0);
    }

    #[tokio::test]
    async fn create_via_manager_feeds_the_worker() {
        let store = Arc::new(MemoryStore::new());
        let manager = taxitera_booking::BookingManager::new(store.clone());

        manager
            .create(
                "user-1",
                CreateBooking {
                    route: "Piassa - Meskel Square".to_string(),
                    vehicle_class: "minibus".to_string(),
                    date: "2026-09-01".to_string(),
                    time: "08:30".to_string(),
                    seats_booked: 1,
                    passenger_names: vec!["Abel".to_string()],
                    price: 23.0,
                },
            )
            .await
            .unwrap();

        let picked = drain_once(&*store, &LogDispatcher, 10, 3).await.unwrap();
        assert_eq!(picked, 1);
    }
}
