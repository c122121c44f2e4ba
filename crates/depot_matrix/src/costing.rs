use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Travel mode requested from the routing engine. Each engine spells the
/// profiles differently, see [`Costing::osrm_profile`] and
/// [`Costing::valhalla_costing`].
#[derive(Debug, Deserialize, Serialize, Copy, Clone, Hash, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Costing {
    #[default]
    Car,
    Bike,
    Foot,
    Truck,
}

impl Costing {
    pub fn osrm_profile(&self) -> &'static str {
        match self {
            Costing::Car | Costing::Truck => "driving",
            Costing::Bike => "cycling",
            Costing::Foot => "walking",
        }
    }

    pub fn valhalla_costing(&self) -> &'static str {
        match self {
            Costing::Car => "auto",
            Costing::Bike => "bicycle",
            Costing::Foot => "pedestrian",
            Costing::Truck => "truck",
        }
    }
}

impl Display for Costing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Costing::Car => "car",
                Costing::Bike => "bike",
                Costing::Foot => "foot",
                Costing::Truck => "truck",
            }
        )
    }
}

impl FromStr for Costing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "car" | "auto" | "driving" => Ok(Costing::Car),
            "bike" | "bicycle" | "cycling" => Ok(Costing::Bike),
            "foot" | "pedestrian" | "walking" => Ok(Costing::Foot),
            "truck" => Ok(Costing::Truck),
            other => Err(format!("Unknown costing profile: {other}")),
        }
    }
}
