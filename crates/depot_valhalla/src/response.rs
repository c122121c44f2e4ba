use depot_matrix::{
    distance_cell::Measurement,
    geo_point::GeoPoint,
    routing_engine::{Grid, Route},
};
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::client::ValhallaError;

const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Route shapes are encoded polylines with 6 decimal digits.
const VALHALLA_PRECISION: u32 = 6;

#[derive(Serialize)]
pub(crate) struct Location {
    lat: f64,
    lon: f64,
}

impl From<&GeoPoint> for Location {
    fn from(point: &GeoPoint) -> Self {
        Self {
            lat: point.lat(),
            lon: point.lon(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct MatrixRequestBody<'a> {
    pub sources: Vec<Location>,
    pub targets: Vec<Location>,
    pub costing: &'a str,
    pub units: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RouteRequestBody<'a> {
    pub locations: [Location; 2],
    pub costing: &'a str,
    pub units: &'a str,
}

#[derive(Deserialize)]
struct MatrixCell {
    /// Kilometers
    distance: Option<f64>,
    /// Seconds
    time: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct MatrixResponse {
    sources_to_targets: Option<Vec<Vec<MatrixCell>>>,
}

#[derive(Deserialize)]
struct Leg {
    shape: Option<String>,
}

#[derive(Deserialize)]
struct Summary {
    /// Kilometers
    length: f64,
    /// Seconds
    time: f64,
}

#[derive(Deserialize)]
struct Trip {
    #[serde(default)]
    legs: Vec<Leg>,
    summary: Summary,
}

#[derive(Deserialize)]
pub(crate) struct RouteResponse {
    trip: Option<Trip>,
}

impl MatrixResponse {
    pub(crate) fn into_grid(
        self,
        num_origins: usize,
        num_destinations: usize,
    ) -> Result<Grid, ValhallaError> {
        let rows = self
            .sources_to_targets
            .ok_or(ValhallaError::IncompleteResponse)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        Measurement::checked(
                            cell.distance.map(|km| km * METERS_PER_KILOMETER),
                            cell.time,
                        )
                    })
                    .collect()
            })
            .collect();

        Ok(Grid::from_rows(rows, num_origins, num_destinations)?)
    }
}

fn decode_shape(shape: &str) -> Result<Vec<GeoPoint>, ValhallaError> {
    let line = polyline::decode_polyline(shape, VALHALLA_PRECISION)
        .map_err(|err| ValhallaError::Polyline(err.to_string()))?;

    line.into_iter()
        .map(|coord| GeoPoint::try_from(coord).map_err(ValhallaError::from))
        .collect()
}

impl RouteResponse {
    pub(crate) fn into_route(self) -> Result<Route, ValhallaError> {
        let trip = self.trip.ok_or(ValhallaError::NoRoute)?;

        let mut geometry: Vec<GeoPoint> = Vec::new();
        for shape in trip.legs.iter().filter_map(|leg| leg.shape.as_deref()) {
            let points = decode_shape(shape)?;
            // consecutive legs share their junction point
            let skip = usize::from(geometry.last().is_some() && geometry.last() == points.first());
            geometry.extend(points.into_iter().skip(skip));
        }

        let distance = trip.summary.length * METERS_PER_KILOMETER;
        if !distance.is_finite() || distance < 0.0 {
            return Err(ValhallaError::IncompleteResponse);
        }

        let duration = SignedDuration::try_from_secs_f64(trip.summary.time)
            .ok()
            .filter(|duration| !duration.is_negative())
            .ok_or(ValhallaError::IncompleteResponse)?;

        Ok(Route {
            geometry,
            distance,
            duration,
        })
    }
}
