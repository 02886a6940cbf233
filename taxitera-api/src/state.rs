use std::sync::Arc;

use taxitera_booking::BookingManager;
use taxitera_pricing::PricingEngine;
use taxitera_store::RedisClient;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingManager>,
    pub pricing: Arc<PricingEngine>,
    /// Shared rate-limit counter. Absent in tests and local runs without
    /// Redis; the limiter fails open in that case.
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit_per_minute: i64,
    pub auth: AuthConfig,
}
