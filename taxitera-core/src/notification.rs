use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::Booking;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingConfirmed,
    BookingCancelled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingConfirmed => "booking_confirmed",
            NotificationKind::BookingCancelled => "booking_cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "booking_confirmed" => Some(NotificationKind::BookingConfirmed),
            "booking_cancelled" => Some(NotificationKind::BookingCancelled),
            _ => None,
        }
    }
}

/// What to tell the owner about a booking. Persisted alongside the booking
/// write so a delivery outage can never lose or block the state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub booking_id: Uuid,
    pub recipient: String,
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
}

impl NotificationIntent {
    pub fn booking_confirmed(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            recipient: booking.owner_id.clone(),
            kind: NotificationKind::BookingConfirmed,
            payload: serde_json::json!({
                "route": booking.route,
                "date": booking.travel_date.to_string(),
                "time": booking.travel_time.format("%H:%M").to_string(),
                "seatsBooked": booking.seats_booked,
                "price": booking.price,
            }),
        }
    }

    pub fn booking_cancelled(booking: &Booking, reason: Option<&str>) -> Self {
        Self {
            booking_id: booking.id,
            recipient: booking.owner_id.clone(),
            kind: NotificationKind::BookingCancelled,
            payload: serde_json::json!({
                "route": booking.route,
                "reason": reason,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutboxStatus {
    Pending,
    Sent,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Sent => "sent",
            OutboxStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OutboxStatus::Pending),
            "sent" => Some(OutboxStatus::Sent),
            "failed" => Some(OutboxStatus::Failed),
            _ => None,
        }
    }
}

/// A stored notification intent awaiting dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub recipient: String,
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    pub fn from_intent(intent: &NotificationIntent) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id: intent.booking_id,
            recipient: intent.recipient.clone(),
            kind: intent.kind,
            payload: intent.payload.clone(),
            status: OutboxStatus::Pending,
            attempts: 0,
            created_at: Utc::now(),
            dispatched_at: None,
        }
    }
}
