use depot_matrix::{
    distance_cell::Measurement,
    geo_point::GeoPoint,
    routing_engine::{Grid, Route},
};
use jiff::SignedDuration;
use serde::Deserialize;

use crate::client::OsrmError;

const OK_CODE: &str = "Ok";

/// Response of the table service.
#[derive(Deserialize)]
pub(crate) struct TableResponse {
    code: String,
    message: Option<String>,

    /// Meters, `null` for unreachable pairs
    distances: Option<Vec<Vec<Option<f64>>>>,

    /// Seconds, only present when requested
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
pub(crate) struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: geojson::Geometry,
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

fn check_code(code: String, message: Option<String>) -> Result<(), OsrmError> {
    if code == OK_CODE {
        return Ok(());
    }

    Err(OsrmError::Engine {
        code,
        message: message.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

impl TableResponse {
    pub(crate) fn into_grid(
        self,
        num_origins: usize,
        num_destinations: usize,
    ) -> Result<Grid, OsrmError> {
        check_code(self.code, self.message)?;

        let distances = self.distances.ok_or(OsrmError::IncompleteResponse)?;
        let durations = self.durations.unwrap_or_default();

        let rows = distances
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, distance)| {
                        let time = durations
                            .get(i)
                            .and_then(|durations| durations.get(j))
                            .copied()
                            .flatten();
                        Measurement::checked(distance, time)
                    })
                    .collect()
            })
            .collect();

        Ok(Grid::from_rows(rows, num_origins, num_destinations)?)
    }
}

impl RouteResponse {
    pub(crate) fn into_route(self) -> Result<Route, OsrmError> {
        if self.code == "NoRoute" {
            return Err(OsrmError::NoRoute);
        }
        check_code(self.code, self.message)?;

        let route = self.routes.into_iter().next().ok_or(OsrmError::NoRoute)?;

        let geojson::Value::LineString(positions) = route.geometry.value else {
            return Err(OsrmError::IncompleteResponse);
        };

        let geometry = positions
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Ok(GeoPoint::new(*lat, *lon)?),
                _ => Err(OsrmError::IncompleteResponse),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !route.distance.is_finite() || route.distance < 0.0 {
            return Err(OsrmError::IncompleteResponse);
        }

        let duration = SignedDuration::try_from_secs_f64(route.duration)
            .ok()
            .filter(|duration| !duration.is_negative())
            .ok_or(OsrmError::IncompleteResponse)?;

        Ok(Route {
            geometry,
            distance: route.distance,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_distances_are_unresolved() {
        let response: TableResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "distances": [[1200.5, null], [300.0, 40.0]],
                "durations": [[60.0, null], [20.0, null]]
            }"#,
        )
        .unwrap();

        let grid = response.into_grid(2, 2).unwrap();

        assert_eq!(
            grid.get(0, 0),
            Some(Measurement {
                distance: 1200.5,
                time: Some(60.0)
            })
        );
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(
            grid.get(1, 1),
            Some(Measurement {
                distance: 40.0,
                time: None
            })
        );
    }

    #[test]
    fn error_code_fails_the_table() {
        let response: TableResponse = serde_json::from_str(
            r#"{"code": "TooBig", "message": "Too many table coordinates"}"#,
        )
        .unwrap();

        let err = response.into_grid(1, 1).unwrap_err();
        assert!(matches!(err, OsrmError::Engine { ref code, .. } if code == "TooBig"));
    }

    #[test]
    fn wrong_table_shape_is_an_error() {
        let response: TableResponse =
            serde_json::from_str(r#"{"code": "Ok", "distances": [[1.0, 2.0]]}"#).unwrap();

        assert!(matches!(
            response.into_grid(2, 2),
            Err(OsrmError::Shape(_))
        ));
    }

    #[test]
    fn geojson_route_is_converted_to_lat_lon() {
        let response: RouteResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "routes": [{
                    "geometry": {"type": "LineString", "coordinates": [[-47.88, -15.79], [-48.5, -16.1], [-49.26, -16.68]]},
                    "distance": 209000.0,
                    "duration": 9000.0
                }]
            }"#,
        )
        .unwrap();

        let route = response.into_route().unwrap();

        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[0].lat(), -15.79);
        assert_eq!(route.geometry[0].lon(), -47.88);
        assert_eq!(route.distance, 209_000.0);
        assert_eq!(route.duration, SignedDuration::from_secs(9000));
    }

    fn route_response(distance: &str, duration: &str) -> RouteResponse {
        serde_json::from_str(&format!(
            r#"{{
                "code": "Ok",
                "routes": [{{
                    "geometry": {{"type": "LineString", "coordinates": [[-47.88, -15.79], [-49.26, -16.68]]}},
                    "distance": {distance},
                    "duration": {duration}
                }}]
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn out_of_range_duration_is_incomplete() {
        assert!(matches!(
            route_response("209000.0", "1e300").into_route(),
            Err(OsrmError::IncompleteResponse)
        ));
        assert!(matches!(
            route_response("209000.0", "-5.0").into_route(),
            Err(OsrmError::IncompleteResponse)
        ));
    }

    #[test]
    fn negative_distance_is_incomplete() {
        assert!(matches!(
            route_response("-1.0", "9000.0").into_route(),
            Err(OsrmError::IncompleteResponse)
        ));
        assert!(route_response("209000.0", "9000.0").into_route().is_ok());
    }

    #[test]
    fn no_route() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#).unwrap();
        assert!(matches!(response.into_route(), Err(OsrmError::NoRoute)));

        let empty: RouteResponse = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
        assert!(matches!(empty.into_route(), Err(OsrmError::NoRoute)));
    }
}
