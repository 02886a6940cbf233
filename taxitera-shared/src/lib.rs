pub mod geo;
pub mod vehicle;

pub use geo::{coordinates, known_distance_km, Location};
pub use vehicle::VehicleClass;
