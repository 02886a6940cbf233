pub mod booking;
pub mod notification;
pub mod repository;

pub use booking::{Booking, BookingStatus, CreateBooking, RescheduleBooking};
pub use notification::{NotificationIntent, NotificationKind, OutboxEntry, OutboxStatus};
pub use repository::{BookingRepository, NotificationDispatcher, NotificationOutbox, RepoError};
