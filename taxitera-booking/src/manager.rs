use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use taxitera_core::booking::{Booking, BookingStatus, CreateBooking, RescheduleBooking};
use taxitera_core::notification::NotificationIntent;
use taxitera_core::repository::BookingRepository;
use taxitera_shared::VehicleClass;
use tracing::info;
use uuid::Uuid;

const MIN_SEATS: u32 = 1;
const MAX_SEATS: u32 = 10;

/// The authenticated caller of a booking operation. Identity comes from the
/// auth collaborator; the manager only checks ownership.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Self { id: id.into(), is_admin: false }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self { id: id.into(), is_admin: true }
    }
}

/// Manages the booking lifecycle and its state transitions
pub struct BookingManager {
    repo: Arc<dyn BookingRepository>,
}

impl BookingManager {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// Create a booking in `confirmed` state and enqueue its confirmation
    /// notification in the same write. Delivery happens asynchronously and
    /// can never fail the create.
    pub async fn create(&self, owner_id: &str, req: CreateBooking) -> Result<Booking, BookingError> {
        if req.seats_booked < MIN_SEATS || req.seats_booked > MAX_SEATS {
            return Err(BookingError::Validation(format!(
                "seatsBooked must be between {} and {}",
                MIN_SEATS, MAX_SEATS
            )));
        }
        if req.passenger_names.len() as u32 != req.seats_booked {
            return Err(BookingError::Validation(
                "passengerNames length must equal seatsBooked".to_string(),
            ));
        }
        if req.passenger_names.iter().any(|n| n.trim().is_empty()) {
            return Err(BookingError::Validation("passenger names must not be blank".to_string()));
        }
        if !req.price.is_finite() || req.price < 0.0 {
            return Err(BookingError::Validation("price must be a non-negative number".to_string()));
        }

        let vehicle_class = VehicleClass::from_id(&req.vehicle_class)
            .ok_or_else(|| BookingError::InvalidVehicleClass(req.vehicle_class.clone()))?;
        let travel_date = parse_date(&req.date)?;
        let travel_time = parse_time(&req.time)?;

        let booking = Booking::new(
            owner_id.to_string(),
            req.route,
            vehicle_class,
            travel_date,
            travel_time,
            req.passenger_names,
            req.price,
        );
        let intent = NotificationIntent::booking_confirmed(&booking);

        self.repo.insert(&booking, &intent).await.map_err(storage)?;
        info!("Booking created: {} for {}", booking.id, booking.owner_id);

        Ok(booking)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Booking, BookingError> {
        let booking = self.fetch(id).await?;
        check_ownership(actor, &booking)?;
        Ok(booking)
    }

    /// Bookings owned by the caller, most recent first.
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Booking>, BookingError> {
        self.repo.list_by_owner(&actor.id).await.map_err(storage)
    }

    /// Cross-owner listing for the operations dashboard.
    pub async fn list_all(
        &self,
        actor: &Actor,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, BookingError> {
        if !actor.is_admin {
            return Err(BookingError::Forbidden);
        }
        self.repo.list(status).await.map_err(storage)
    }

    /// Cancel a booking. Idempotent: a second cancel is a no-op, and any
    /// prior status ends up `cancelled`. Enqueues a cancellation notice only
    /// when the status actually changes.
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.fetch(id).await?;
        check_ownership(actor, &booking)?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        booking.mark_cancelled(reason.clone());
        let intent = NotificationIntent::booking_cancelled(&booking, reason.as_deref());
        self.repo.update(&booking, Some(&intent)).await.map_err(storage)?;
        info!("Booking cancelled: {}", booking.id);

        Ok(booking)
    }

    /// Reschedule a confirmed booking, adding the change fee on top of the
    /// existing price. Cancelled and completed bookings cannot be changed.
    pub async fn reschedule(
        &self,
        actor: &Actor,
        id: Uuid,
        req: RescheduleBooking,
    ) -> Result<Booking, BookingError> {
        if !req.additional_fee.is_finite() || req.additional_fee < 0.0 {
            return Err(BookingError::Validation(
                "additionalFee must be a non-negative number".to_string(),
            ));
        }
        let travel_date = parse_date(&req.date)?;
        let travel_time = parse_time(&req.time)?;

        let mut booking = self.fetch(id).await?;
        check_ownership(actor, &booking)?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidTransition {
                from: booking.status.as_str().to_string(),
                to: "rescheduled".to_string(),
            });
        }

        booking.reschedule(travel_date, travel_time, req.additional_fee);
        self.repo.update(&booking, None).await.map_err(storage)?;
        info!("Booking rescheduled: {} (+{})", booking.id, req.additional_fee);

        Ok(booking)
    }

    /// Transition: confirmed -> completed. No fee logic.
    pub async fn complete(&self, actor: &Actor, id: Uuid) -> Result<Booking, BookingError> {
        let mut booking = self.fetch(id).await?;
        check_ownership(actor, &booking)?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidTransition {
                from: booking.status.as_str().to_string(),
                to: BookingStatus::Completed.as_str().to_string(),
            });
        }

        booking.mark_completed();
        self.repo.update(&booking, None).await.map_err(storage)?;
        info!("Booking completed: {}", booking.id);

        Ok(booking)
    }

    async fn fetch(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.repo.get(id).await.map_err(storage)?.ok_or(BookingError::NotFound(id))
    }
}

fn check_ownership(actor: &Actor, booking: &Booking) -> Result<(), BookingError> {
    if actor.is_admin || booking.owner_id == actor.id {
        Ok(())
    } else {
        Err(BookingError::Forbidden)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("malformed date: {}", s)))
}

fn parse_time(s: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| BookingError::Validation(format!("malformed time: {}", s)))
}

fn storage(e: taxitera_core::repository::RepoError) -> BookingError {
    BookingError::Storage(e.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Booking does not belong to the caller")]
    Forbidden,

    #[error("Invalid vehicle class: {0}")]
    InvalidVehicleClass(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Storage error: {0}")]
    Storage(String),
}
