use serde::Serialize;

/// A named pickup/dropoff point in the Addis Ababa service area.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Service-area locations with coordinates. Shared with the map layer.
pub const LOCATIONS: [Location; 23] = [
    Location { name: "Piassa", lat: 9.0320, lng: 38.7469 },
    Location { name: "Arat Kilo", lat: 9.0365, lng: 38.7635 },
    Location { name: "Meskel Square", lat: 9.0120, lng: 38.7634 },
    Location { name: "Sidist Kilo", lat: 9.0410, lng: 38.7580 },
    Location { name: "Megenagna", lat: 8.9806, lng: 38.7578 },
    Location { name: "Mexico", lat: 9.0157, lng: 38.7614 },
    Location { name: "Jemo", lat: 8.9500, lng: 38.7200 },
    Location { name: "Ayat", lat: 8.9200, lng: 38.7800 },
    Location { name: "Sar Bet", lat: 9.0500, lng: 38.7400 },
    Location { name: "Mexico Square", lat: 9.0180, lng: 38.7600 },
    Location { name: "CMC", lat: 9.0050, lng: 38.7450 },
    Location { name: "Kazanchis", lat: 9.0280, lng: 38.7520 },
    Location { name: "Kirkos", lat: 9.0100, lng: 38.7300 },
    Location { name: "Gurd Sholla", lat: 8.9800, lng: 38.7100 },
    Location { name: "Saris", lat: 9.0600, lng: 38.7700 },
    Location { name: "Saris Bet", lat: 9.0650, lng: 38.7750 },
    Location { name: "Bole Bus Station", lat: 8.9950, lng: 38.7850 },
    Location { name: "Central Railway Station", lat: 9.0300, lng: 38.7400 },
    Location { name: "Addis Ababa Airport", lat: 8.9806, lng: 38.7992 },
    Location { name: "Merkato", lat: 9.0157, lng: 38.7251 },
    Location { name: "Lebu", lat: 8.9400, lng: 38.6800 },
    Location { name: "Bole-arabsa", lat: 8.9900, lng: 38.8000 },
    Location { name: "Tor Hayloch", lat: 9.0800, lng: 38.8200 },
];

/// Surveyed road distances for frequently quoted pairs, in km.
/// Lookup is bidirectional.
const ROUTE_DISTANCES_KM: [(&str, &str, f64); 18] = [
    ("Piassa", "Arat Kilo", 3.0),
    ("Piassa", "Meskel Square", 5.0),
    ("Arat Kilo", "Sidist Kilo", 4.0),
    ("Meskel Square", "Megenagna", 8.0),
    ("Mexico", "Jemo", 12.0),
    ("Ayat", "Sar Bet", 15.0),
    ("CMC", "Kazanchis", 6.0),
    ("Kirkos", "Gurd Sholla", 7.0),
    ("Saris", "Bole Bus Station", 10.0),
    ("Central Railway Station", "Merkato", 4.0),
    ("Addis Ababa Airport", "Bole", 8.0),
    ("Lebu", "Bole-arabsa", 18.0),
    ("Tor Hayloch", "Mexico Square", 20.0),
    ("Piassa", "Airport", 25.0),
    ("Merkato", "Airport", 22.0),
    ("Mexico", "Airport", 15.0),
    ("Ayat", "Piassa", 20.0),
    ("Jemo", "Kazanchis", 25.0),
];

/// Road distance for a known pair, in either direction.
pub fn known_distance_km(from: &str, to: &str) -> Option<f64> {
    ROUTE_DISTANCES_KM
        .iter()
        .find(|(a, b, _)| (*a == from && *b == to) || (*a == to && *b == from))
        .map(|(_, _, km)| *km)
}

pub fn coordinates(name: &str) -> Option<(f64, f64)> {
    LOCATIONS
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name))
        .map(|l| (l.lat, l.lng))
}
