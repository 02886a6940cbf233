use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::notification::{NotificationIntent, OutboxEntry};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking together with its confirmation intent.
    /// Implementations must write both atomically.
    async fn insert(&self, booking: &Booking, intent: &NotificationIntent) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// Rewrite a booking row, optionally enqueueing a notification in the
    /// same write.
    async fn update(
        &self,
        booking: &Booking,
        intent: Option<&NotificationIntent>,
    ) -> Result<(), RepoError>;

    /// All bookings for an owner, most recent first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>, RepoError>;

    /// All bookings across owners, most recent first.
    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, RepoError>;
}

/// Repository trait for the notification outbox (dispatch side)
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    async fn fetch_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, RepoError>;

    async fn mark_sent(&self, id: Uuid) -> Result<(), RepoError>;

    /// Record a failed attempt; entries past `max_attempts` move to `failed`.
    async fn mark_failed(&self, id: Uuid, max_attempts: u32) -> Result<(), RepoError>;
}

/// Delivery seam. Transport mechanics (email, SMS, push) live behind this
/// trait and stay out of the booking path entirely.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, entry: &OutboxEntry) -> Result<(), RepoError>;
}
