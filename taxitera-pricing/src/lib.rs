pub mod calculator;
pub mod quote;

pub use calculator::{FareConfig, PricingEngine, PricingError};
pub use quote::{FareBreakdown, PopularRoute, RouteQuote, VehicleClassInfo};
