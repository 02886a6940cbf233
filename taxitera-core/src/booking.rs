use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use taxitera_shared::VehicleClass;
use uuid::Uuid;

/// A reserved trip owned by one user. Soft-cancelled, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub owner_id: String,
    /// Route descriptor, e.g. "Piassa - Meskel Square"
    pub route: String,
    pub vehicle_class: VehicleClass,
    pub travel_date: NaiveDate,
    pub travel_time: NaiveTime,
    pub seats_booked: u32,
    pub passenger_names: Vec<String>,
    pub price: f64,
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

impl Booking {
    /// New booking in the only valid initial state.
    pub fn new(
        owner_id: String,
        route: String,
        vehicle_class: VehicleClass,
        travel_date: NaiveDate,
        travel_time: NaiveTime,
        passenger_names: Vec<String>,
        price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            route,
            vehicle_class,
            travel_date,
            travel_time,
            seats_booked: passenger_names.len() as u32,
            passenger_names,
            price,
            status: BookingStatus::Confirmed,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_cancelled(&mut self, reason: Option<String>) {
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = reason;
        self.updated_at = Utc::now();
    }

    pub fn mark_completed(&mut self) {
        self.status = BookingStatus::Completed;
        self.updated_at = Utc::now();
    }

    /// Reschedule and add the change fee on top of the current price.
    pub fn reschedule(&mut self, date: NaiveDate, time: NaiveTime, additional_fee: f64) {
        self.travel_date = date;
        self.travel_time = time;
        self.price += additional_fee;
        self.updated_at = Utc::now();
    }
}

/// Passenger-facing creation request, price already quoted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub route: String,
    #[serde(rename = "type")]
    pub vehicle_class: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "seatsBooked")]
    pub seats_booked: u32,
    #[serde(rename = "passengerNames")]
    pub passenger_names: Vec<String>,
    pub price: f64,
}

/// Reschedule request: new travel slot plus the change fee charged on top.
#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleBooking {
    pub date: String,
    pub time: String,
    #[serde(rename = "additionalFee")]
    pub additional_fee: f64,
}
