use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeoPointError {
    #[error("Latitude {0} is outside of [-90, 90]")]
    Latitude(f64),

    #[error("Longitude {0} is outside of [-180, 180]")]
    Longitude(f64),
}

/// A WGS84 coordinate. Engines that expect `lon,lat` ordering convert at the
/// protocol boundary, everything inside the crate is `lat`/`lon`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lon)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoPointError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoPointError::Latitude(lat));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoPointError::Longitude(lon));
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl TryFrom<geo_types::Coord> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(coord: geo_types::Coord) -> Result<Self, Self::Error> {
        GeoPoint::new(coord.y, coord.x)
    }
}

impl From<GeoPoint> for geo_types::Coord {
    fn from(point: GeoPoint) -> Self {
        geo_types::Coord {
            x: point.lon,
            y: point.lat,
        }
    }
}
