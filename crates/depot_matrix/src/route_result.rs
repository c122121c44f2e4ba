use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{fallback, geo_point::GeoPoint, routing_engine::Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Geometry, distance and duration come from the routing engine
    Routed,
    /// Straight line with an estimated distance and duration
    Fallback,
}

/// The route from an origin to its farthest destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub origin_index: usize,
    pub destination_index: usize,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub geometry: Vec<GeoPoint>,
    /// Meters
    pub distance: f64,
    pub duration: SignedDuration,
    pub source: RouteSource,
}

impl RouteResult {
    pub fn routed(
        (origin_index, origin): (usize, GeoPoint),
        (destination_index, destination): (usize, GeoPoint),
        route: Route,
    ) -> Self {
        Self {
            origin_index,
            destination_index,
            origin,
            destination,
            geometry: route.geometry,
            distance: route.distance,
            duration: route.duration,
            source: RouteSource::Routed,
        }
    }

    pub fn fallback(
        (origin_index, origin): (usize, GeoPoint),
        (destination_index, destination): (usize, GeoPoint),
    ) -> Self {
        let distance = fallback::estimate(&origin, &destination);

        Self {
            origin_index,
            destination_index,
            origin,
            destination,
            geometry: vec![origin, destination],
            distance,
            duration: fallback::estimate_duration(distance),
            source: RouteSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RouteSource::Fallback
    }
}
