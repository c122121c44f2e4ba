use std::future::Future;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{chunk_planner::Chunk, distance_cell::Measurement, geo_point::GeoPoint};

/// The coordinates of one chunk, ready to be sent to the engine.
pub struct TableRequest<'a> {
    pub chunk: &'a Chunk,
    pub origins: &'a [GeoPoint],
    pub destinations: &'a [GeoPoint],
}

impl<'a> TableRequest<'a> {
    /// `origins` and `destinations` are the full inputs, the request only
    /// borrows the chunk's slices.
    pub fn new(chunk: &'a Chunk, origins: &'a [GeoPoint], destinations: &'a [GeoPoint]) -> Self {
        Self {
            chunk,
            origins: &origins[chunk.origins()],
            destinations: &destinations[chunk.destinations()],
        }
    }

    /// Payload coordinates, origins first.
    pub fn coordinates(&self) -> impl Iterator<Item = &'a GeoPoint> + use<'a> {
        self.origins.iter().chain(self.destinations.iter())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Expected a {expected_origins}x{expected_destinations} table, got {origins}x{destinations}")]
pub struct ShapeMismatch {
    pub expected_origins: usize,
    pub expected_destinations: usize,
    pub origins: usize,
    pub destinations: usize,
}

/// The table returned for one chunk, `None` where the engine could not
/// resolve the pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    num_origins: usize,
    num_destinations: usize,
    cells: Vec<Option<Measurement>>,
}

impl Grid {
    pub fn from_rows(
        rows: Vec<Vec<Option<Measurement>>>,
        num_origins: usize,
        num_destinations: usize,
    ) -> Result<Self, ShapeMismatch> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.len() != num_origins || rows.iter().any(|row| row.len() != num_destinations) {
            return Err(ShapeMismatch {
                expected_origins: num_origins,
                expected_destinations: num_destinations,
                origins: rows.len(),
                destinations: width,
            });
        }

        Ok(Self {
            num_origins,
            num_destinations,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn filled(num_origins: usize, num_destinations: usize, value: Option<Measurement>) -> Self {
        Self {
            num_origins,
            num_destinations,
            cells: vec![value; num_origins * num_destinations],
        }
    }

    pub fn num_origins(&self) -> usize {
        self.num_origins
    }

    pub fn num_destinations(&self) -> usize {
        self.num_destinations
    }

    pub fn get(&self, origin: usize, destination: usize) -> Option<Measurement> {
        self.cells[origin * self.num_destinations + destination]
    }
}

/// A point to point route as returned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub geometry: Vec<GeoPoint>,
    /// Meters
    pub distance: f64,
    pub duration: SignedDuration,
}

/// A remote routing engine able to answer table and route queries.
///
/// Failures are reported per call: a failed table request means the whole
/// chunk is unresolved, individual unreachable pairs are `None` in the
/// returned [`Grid`].
pub trait RoutingEngine: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_table(
        &self,
        request: TableRequest<'_>,
    ) -> impl Future<Output = Result<Grid, Self::Error>> + Send;

    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<Route, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::points;

    #[test]
    fn request_borrows_chunk_slices() {
        let origins = points(7);
        let destinations = points(6);
        let chunk = Chunk::new(5..7, 0..5);

        let request = TableRequest::new(&chunk, &origins, &destinations);

        assert_eq!(request.origins, &origins[5..7]);
        assert_eq!(request.destinations, &destinations[0..5]);
        assert_eq!(request.coordinates().count(), 7);
        assert_eq!(request.coordinates().next(), Some(&origins[5]));
    }

    #[test]
    fn grid_rejects_wrong_shape() {
        let measurement = Some(Measurement {
            distance: 1.0,
            time: None,
        });

        let grid = Grid::from_rows(vec![vec![measurement, None]], 1, 2).unwrap();
        assert_eq!(grid.get(0, 0), measurement);
        assert_eq!(grid.get(0, 1), None);

        let err = Grid::from_rows(vec![vec![measurement]], 1, 2).unwrap_err();
        assert_eq!(err.destinations, 1);
        assert_eq!(err.expected_destinations, 2);
    }
}
