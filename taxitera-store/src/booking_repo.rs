use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use taxitera_core::booking::{Booking, BookingStatus};
use taxitera_core::notification::{NotificationIntent, NotificationKind, OutboxEntry, OutboxStatus};
use taxitera_core::repository::{BookingRepository, NotificationOutbox, RepoError};
use taxitera_shared::VehicleClass;
use uuid::Uuid;

/// Postgres-backed booking store. Booking writes and their notification
/// intents share one transaction.
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    owner_id: String,
    route: String,
    vehicle_class: String,
    travel_date: NaiveDate,
    travel_time: NaiveTime,
    seats_booked: i32,
    passenger_names: Vec<String>,
    price: f64,
    status: String,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        let vehicle_class = VehicleClass::from_id(&self.vehicle_class)
            .ok_or_else(|| format!("unknown vehicle class in store: {}", self.vehicle_class))?;
        let status = BookingStatus::from_str(&self.status)
            .ok_or_else(|| format!("unknown booking status in store: {}", self.status))?;

        Ok(Booking {
            id: self.id,
            owner_id: self.owner_id,
            route: self.route,
            vehicle_class,
            travel_date: self.travel_date,
            travel_time: self.travel_time,
            seats_booked: self.seats_booked as u32,
            passenger_names: self.passenger_names,
            price: self.price,
            status,
            cancellation_reason: self.cancellation_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OutboxRow {
    id: Uuid,
    booking_id: Uuid,
    recipient: String,
    kind: String,
    payload: serde_json::Value,
    status: String,
    attempts: i32,
    created_at: DateTime<Utc>,
    dispatched_at: Option<DateTime<Utc>>,
}

impl OutboxRow {
    fn into_entry(self) -> Result<OutboxEntry, RepoError> {
        let kind = NotificationKind::from_str(&self.kind)
            .ok_or_else(|| format!("unknown notification kind in store: {}", self.kind))?;
        let status = OutboxStatus::from_str(&self.status)
            .ok_or_else(|| format!("unknown outbox status in store: {}", self.status))?;

        Ok(OutboxEntry {
            id: self.id,
            booking_id: self.booking_id,
            recipient: self.recipient,
            kind,
            payload: self.payload,
            status,
            attempts: self.attempts as u32,
            created_at: self.created_at,
            dispatched_at: self.dispatched_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, owner_id, route, vehicle_class, travel_date, travel_time, \
     seats_booked, passenger_names, price, status, cancellation_reason, created_at, updated_at";

async fn enqueue_intent(
    tx: &mut Transaction<'_, Postgres>,
    intent: &NotificationIntent,
) -> Result<(), sqlx::Error> {
    let entry = OutboxEntry::from_intent(intent);
    sqlx::query(
        "INSERT INTO notification_outbox \
         (id, booking_id, recipient, kind, payload, status, attempts, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(entry.id)
    .bind(entry.booking_id)
    .bind(&entry.recipient)
    .bind(entry.kind.as_str())
    .bind(&entry.payload)
    .bind(entry.status.as_str())
    .bind(entry.attempts as i32)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl BookingRepository for PgBookingStore {
    async fn insert(&self, booking: &Booking, intent: &NotificationIntent) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO bookings \
             (id, owner_id, route, vehicle_class, travel_date, travel_time, seats_booked, \
              passenger_names, price, status, cancellation_reason, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(booking.id)
        .bind(&booking.owner_id)
        .bind(&booking.route)
        .bind(booking.vehicle_class.id())
        .bind(booking.travel_date)
        .bind(booking.travel_time)
        .bind(booking.seats_booked as i32)
        .bind(&booking.passenger_names)
        .bind(booking.price)
        .bind(booking.status.as_str())
        .bind(&booking.cancellation_reason)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        enqueue_intent(&mut tx, intent).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn update(
        &self,
        booking: &Booking,
        intent: Option<&NotificationIntent>,
    ) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE bookings SET route = $2, vehicle_class = $3, travel_date = $4, \
             travel_time = $5, seats_booked = $6, passenger_names = $7, price = $8, \
             status = $9, cancellation_reason = $10, updated_at = $11 WHERE id = $1",
        )
        .bind(booking.id)
        .bind(&booking.route)
        .bind(booking.vehicle_class.id())
        .bind(booking.travel_date)
        .bind(booking.travel_time)
        .bind(booking.seats_booked as i32)
        .bind(&booking.passenger_names)
        .bind(booking.price)
        .bind(booking.status.as_str())
        .bind(&booking.cancellation_reason)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(intent) = intent {
            enqueue_intent(&mut tx, intent).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, RepoError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {} FROM bookings WHERE status = $1 ORDER BY created_at DESC",
                    BOOKING_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {} FROM bookings ORDER BY created_at DESC",
                    BOOKING_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(BookingRow::into_booking).collect()
    }
}

#[async_trait]
impl NotificationOutbox for PgBookingStore {
    async fn fetch_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, RepoError> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            "SELECT id, booking_id, recipient, kind, payload, status, attempts, \
             created_at, dispatched_at \
             FROM notification_outbox WHERE status = 'pending' \
             ORDER BY created_at ASC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OutboxRow::into_entry).collect()
    }

    async fn mark_sent(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE notification_outbox SET status = 'sent', attempts = attempts + 1, \
             dispatched_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, max_attempts: u32) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE notification_outbox SET attempts = attempts + 1, \
             status = CASE WHEN attempts + 1 >= $2 THEN 'failed' ELSE status END \
             WHERE id = $1",
        )
        .bind(id)
        .bind(max_attempts as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
