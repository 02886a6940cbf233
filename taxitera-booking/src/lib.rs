pub mod manager;
pub mod memory;

pub use manager::{Actor, BookingError, BookingManager};
pub use memory::MemoryStore;
