use taxitera_shared::{coordinates, known_distance_km, VehicleClass};

use crate::quote::{FareBreakdown, PopularRoute, RouteQuote, VehicleClassInfo};

/// Fare calculation engine
pub struct PricingEngine {
    config: FareConfig,
}

#[derive(Debug, Clone)]
pub struct FareConfig {
    /// Flat fare applied to every trip
    pub base_fare: f64,

    /// Rate per road kilometre
    pub per_km_rate: f64,

    /// Added when either endpoint is an airport
    pub airport_surcharge: f64,

    /// Per-person floor after the multiplier is applied
    pub min_fare_per_person: f64,

    /// Estimate used when an endpoint has no stored coordinates
    pub default_distance_km: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: 10.0,
            per_km_rate: 2.5,
            airport_surcharge: 30.0,
            min_fare_per_person: 15.0,
            default_distance_km: 15.0,
        }
    }
}

impl PricingEngine {
    pub fn new(config: FareConfig) -> Self {
        Self { config }
    }

    /// Quote a trip for `passengers` people.
    ///
    /// Deterministic for every route: known pairs use the surveyed distance
    /// table, unmapped pairs fall back to a great-circle estimate from the
    /// stored coordinates, so repeated calls always agree.
    pub fn quote(
        &self,
        from: &str,
        to: &str,
        vehicle_class: &str,
        passengers: u32,
    ) -> Result<RouteQuote, PricingError> {
        let class = VehicleClass::from_id(vehicle_class)
            .ok_or_else(|| PricingError::InvalidVehicleClass(vehicle_class.to_string()))?;

        if passengers < 1 {
            return Err(PricingError::InvalidPassengerCount(passengers));
        }

        let distance = self.distance_km(from, to);
        let airport_surcharge = if from.contains("Airport") || to.contains("Airport") {
            self.config.airport_surcharge
        } else {
            0.0
        };

        let distance_price = distance * self.config.per_km_rate;
        let route_price =
            ((self.config.base_fare + distance_price + airport_surcharge) * class.price_multiplier()).round();
        let price_per_person = route_price.max(self.config.min_fare_per_person);
        let total_price = price_per_person * f64::from(passengers);

        Ok(RouteQuote {
            from: from.to_string(),
            to: to.to_string(),
            vehicle_type: class.display_name().to_string(),
            distance,
            price_per_person,
            total_price,
            passengers,
            breakdown: FareBreakdown {
                base_price: self.config.base_fare,
                distance_price,
                airport_surcharge,
                vehicle_multiplier: class.price_multiplier(),
            },
        })
    }

    /// Road distance for a route, in km.
    ///
    /// Surveyed table first; otherwise a haversine estimate from stored
    /// coordinates, rounded to whole km to match the table's granularity.
    /// Endpoints with no coordinates get a fixed service-area default.
    pub fn distance_km(&self, from: &str, to: &str) -> f64 {
        if let Some(km) = known_distance_km(from, to) {
            return km;
        }

        match (coordinates(from), coordinates(to)) {
            (Some(a), Some(b)) => haversine_km(a, b).round(),
            _ => self.config.default_distance_km,
        }
    }

    pub fn vehicle_classes(&self) -> Vec<VehicleClassInfo> {
        VehicleClass::ALL.iter().map(|c| VehicleClassInfo::from(*c)).collect()
    }

    /// Showcase routes, priced through the same calculator so the listed
    /// fares can never drift from what `quote` would return.
    pub fn popular_routes(&self) -> Vec<PopularRoute> {
        const SHOWCASE: [(&str, &str); 4] = [
            ("Piassa", "Meskel Square"),
            ("Mexico", "Addis Ababa Airport"),
            ("Merkato", "Bole"),
            ("Arat Kilo", "Megenagna"),
        ];

        SHOWCASE
            .iter()
            .filter_map(|(from, to)| {
                self.quote(from, to, VehicleClass::Minibus.id(), 1).ok().map(|q| PopularRoute {
                    from: q.from,
                    to: q.to,
                    price: q.price_per_person,
                })
            })
            .collect()
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(FareConfig::default())
    }
}

fn haversine_km((lat1, lng1): (f64, f64), (lat2, lng2): (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid vehicle class: {0}")]
    InvalidVehicleClass(String),

    #[error("Invalid passenger count: {0}")]
    InvalidPassengerCount(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_known_route() {
        let engine = PricingEngine::default();

        // 10 base + 5km * 2.5 = 22.5, rounds to 23, two passengers
        let quote = engine.quote("Piassa", "Meskel Square", "minibus", 2).unwrap();
        assert_eq!(quote.distance, 5.0);
        assert_eq!(quote.price_per_person, 23.0);
        assert_eq!(quote.total_price, 46.0);
    }

    #[test]
    fn applies_airport_surcharge() {
        let engine = PricingEngine::default();

        let quote = engine.quote("Mexico", "Airport", "minibus", 1).unwrap();
        assert_eq!(quote.breakdown.airport_surcharge, 30.0);
        // 10 + 15 * 2.5 + 30 = 77.5 -> 78
        assert_eq!(quote.price_per_person, 78.0);
    }

    #[test]
    fn enforces_per_person_floor() {
        let engine = PricingEngine::default();

        // 3km on a bus: (10 + 7.5) * 0.7 = 12.25 -> 12, floored to 15
        let quote = engine.quote("Piassa", "Arat Kilo", "bus", 3).unwrap();
        assert_eq!(quote.price_per_person, 15.0);
        assert_eq!(quote.total_price, 45.0);
    }

    #[test]
    fn unmapped_route_is_deterministic() {
        let engine = PricingEngine::default();

        // Not in the surveyed table; estimated from coordinates.
        let a = engine.quote("Arat Kilo", "Megenagna", "minibus", 1).unwrap();
        let b = engine.quote("Arat Kilo", "Megenagna", "minibus", 1).unwrap();
        assert_eq!(a.distance, b.distance);
        assert_eq!(a.total_price, b.total_price);
        assert!(a.total_price >= 15.0);
    }

    #[test]
    fn unknown_location_uses_default_distance() {
        let engine = PricingEngine::default();

        let quote = engine.quote("Somewhere", "Elsewhere", "minibus", 1).unwrap();
        assert_eq!(quote.distance, 15.0);
    }

    #[test]
    fn rejects_unknown_vehicle_class() {
        let engine = PricingEngine::default();

        let err = engine.quote("Piassa", "Meskel Square", "tram", 1).unwrap_err();
        assert!(matches!(err, PricingError::InvalidVehicleClass(_)));
    }

    #[test]
    fn rejects_zero_passengers() {
        let engine = PricingEngine::default();

        let err = engine.quote("Piassa", "Meskel Square", "minibus", 0).unwrap_err();
        assert!(matches!(err, PricingError::InvalidPassengerCount(0)));
    }

    #[test]
    fn total_respects_floor_for_every_class() {
        let engine = PricingEngine::default();

        for class in taxitera_shared::VehicleClass::ALL {
            let quote = engine.quote("Piassa", "Arat Kilo", class.id(), 4).unwrap();
            assert!(quote.price_per_person >= 15.0);
            assert_eq!(quote.total_price, quote.price_per_person * 4.0);
        }
    }

    #[test]
    fn quote_serializes_with_original_field_names() {
        let engine = PricingEngine::default();

        let quote = engine.quote("Piassa", "Meskel Square", "minibus", 2).unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["vehicleType"], "Minibus");
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["pricePerPerson"], 23.0);
        assert_eq!(json["totalPrice"], 46.0);
        assert_eq!(json["breakdown"]["basePrice"], 10.0);
        assert_eq!(json["breakdown"]["distancePrice"], 12.5);
        assert_eq!(json["breakdown"]["airportSurcharge"], 0.0);
        assert_eq!(json["breakdown"]["vehicleMultiplier"], 1.0);
    }

    #[test]
    fn popular_routes_match_live_quotes() {
        let engine = PricingEngine::default();

        let routes = engine.popular_routes();
        assert_eq!(routes.len(), 4);
        for route in routes {
            let quote = engine.quote(&route.from, &route.to, "minibus", 1).unwrap();
            assert_eq!(route.price, quote.price_per_person);
        }
    }
}
