use crate::geo_point::GeoPoint;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters.
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let (from_lat, to_lat) = (from.lat().to_radians(), to.lat().to_radians());
    let half_dlat = (to_lat - from_lat) / 2.0;
    let half_dlon = (to.lon() - from.lon()).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + from_lat.cos() * to_lat.cos() * half_dlon.sin().powi(2);

    // h can overshoot 1.0 by rounding for antipodal points
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

impl GeoPoint {
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}
