use serde::{Deserialize, Serialize};

/// Distance (meters) and travel time (seconds) reported by the engine for one
/// origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Measurement {
    pub distance: f64,
    pub time: Option<f64>,
}

impl Measurement {
    /// Engines report unreachable pairs in various ways, anything that is not a
    /// finite, non-negative distance is treated as missing.
    pub fn checked(distance: Option<f64>, time: Option<f64>) -> Option<Self> {
        let distance = distance.filter(|d| d.is_finite() && *d >= 0.0)?;
        let time = time.filter(|t| t.is_finite() && *t >= 0.0);
        Some(Self { distance, time })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DistanceCell {
    #[default]
    Unresolved,
    Resolved {
        distance: f64,
        time: Option<f64>,
    },
    Estimated {
        distance: f64,
    },
}

impl DistanceCell {
    pub fn distance(&self) -> Option<f64> {
        match self {
            DistanceCell::Unresolved => None,
            DistanceCell::Resolved { distance, .. } | DistanceCell::Estimated { distance } => {
                Some(*distance)
            }
        }
    }

    pub fn time(&self) -> Option<f64> {
        match self {
            DistanceCell::Resolved { time, .. } => *time,
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, DistanceCell::Unresolved)
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, DistanceCell::Estimated { .. })
    }
}

impl From<Measurement> for DistanceCell {
    fn from(measurement: Measurement) -> Self {
        DistanceCell::Resolved {
            distance: measurement.distance,
            time: measurement.time,
        }
    }
}
