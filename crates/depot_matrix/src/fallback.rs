use jiff::SignedDuration;

use crate::{geo_point::GeoPoint, haversine::haversine_distance};

/// Roads are rarely straight, the great-circle distance is scaled by this
/// factor to approximate the road distance.
pub const TORTUOSITY_FACTOR: f64 = 1.3;

/// Average speed assumed for estimated routes.
pub const FALLBACK_SPEED_KMH: f64 = 60.0;

/// Estimated road distance in meters.
pub fn estimate(origin: &GeoPoint, destination: &GeoPoint) -> f64 {
    haversine_distance(origin, destination) * TORTUOSITY_FACTOR
}

/// Time needed to drive `distance` meters at [`FALLBACK_SPEED_KMH`].
pub fn estimate_duration(distance: f64) -> SignedDuration {
    let seconds = distance * 3.6 / FALLBACK_SPEED_KMH;
    SignedDuration::from_secs_f64(seconds)
}
