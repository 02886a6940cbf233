use serde::{Deserialize, Serialize};

/// Closed set of trip categories. Reference data, not user-editable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Minibus,
    Higer,
    Bus,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Minibus, VehicleClass::Higer, VehicleClass::Bus];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "minibus" => Some(VehicleClass::Minibus),
            "higer" => Some(VehicleClass::Higer),
            "bus" => Some(VehicleClass::Bus),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            VehicleClass::Minibus => "minibus",
            VehicleClass::Higer => "higer",
            VehicleClass::Bus => "bus",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleClass::Minibus => "Minibus",
            VehicleClass::Higer => "Higer",
            VehicleClass::Bus => "Bus",
        }
    }

    pub fn seat_capacity(&self) -> u32 {
        match self {
            VehicleClass::Minibus => 12,
            VehicleClass::Higer => 45,
            VehicleClass::Bus => 50,
        }
    }

    /// Fare multiplier relative to the minibus base fare.
    pub fn price_multiplier(&self) -> f64 {
        match self {
            VehicleClass::Minibus => 1.0,
            VehicleClass::Higer => 0.8,
            VehicleClass::Bus => 0.7,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VehicleClass::Minibus => "Standard comfort",
            VehicleClass::Higer => "Economy option",
            VehicleClass::Bus => "Budget friendly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids() {
        assert_eq!(VehicleClass::from_id("minibus"), Some(VehicleClass::Minibus));
        assert_eq!(VehicleClass::from_id("higer"), Some(VehicleClass::Higer));
        assert_eq!(VehicleClass::from_id("bus"), Some(VehicleClass::Bus));
        assert_eq!(VehicleClass::from_id("limousine"), None);
    }

    #[test]
    fn round_trips_through_serde() {
        let json = serde_json::to_string(&VehicleClass::Higer).unwrap();
        assert_eq!(json, "\"higer\"");
    }
}
