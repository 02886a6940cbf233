use serde::{Deserialize, Serialize};
use taxitera_shared::VehicleClass;

/// Ephemeral price quote for a prospective trip. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    pub from: String,
    pub to: String,
    /// Display name of the class, e.g. "Minibus"
    pub vehicle_type: String,
    pub distance: f64,
    pub price_per_person: f64,
    pub total_price: f64,
    pub passengers: u32,
    pub breakdown: FareBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareBreakdown {
    pub base_price: f64,
    pub distance_price: f64,
    pub airport_surcharge: f64,
    pub vehicle_multiplier: f64,
}

/// Vehicle class reference data as exposed on the pricing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleClassInfo {
    pub id: String,
    pub name: String,
    pub seats: u32,
    pub multiplier: f64,
    pub description: String,
}

impl From<VehicleClass> for VehicleClassInfo {
    fn from(class: VehicleClass) -> Self {
        Self {
            id: class.id().to_string(),
            name: class.display_name().to_string(),
            seats: class.seat_capacity(),
            multiplier: class.price_multiplier(),
            description: class.description().to_string(),
        }
    }
}

/// Showcase route with its current per-person minibus fare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularRoute {
    pub from: String,
    pub to: String,
    pub price: f64,
}
