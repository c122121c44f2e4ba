use futures::{StreamExt, stream};
use tracing::{debug, warn};

use crate::{
    distance_cell::DistanceCell,
    distance_matrix::DistanceMatrix,
    error::MatrixError,
    matrix_config::MatrixConfig,
    route_result::RouteResult,
    routing_engine::{Route, RoutingEngine},
};

/// Index of the farthest destination of a row. Ties keep the first one,
/// unresolved cells are skipped.
pub fn farthest_destination(row: &[DistanceCell]) -> Option<usize> {
    let mut farthest: Option<(usize, f64)> = None;

    for (index, cell) in row.iter().enumerate() {
        let Some(distance) = cell.distance() else {
            continue;
        };

        match farthest {
            Some((_, max)) if distance <= max => {}
            _ => farthest = Some((index, distance)),
        }
    }

    farthest.map(|(index, _)| index)
}

/// A line with a finite, non-negative length and duration.
fn is_usable(route: &Route) -> bool {
    route.geometry.len() >= 2
        && route.distance.is_finite()
        && route.distance >= 0.0
        && !route.duration.is_negative()
}

/// For every origin, fetches the route to its farthest destination.
pub struct FarthestRouteSelector<E> {
    engine: E,
    concurrency: usize,
}

impl<E> FarthestRouteSelector<E>
where
    E: RoutingEngine,
{
    pub fn new(engine: E, config: &MatrixConfig) -> Result<Self, MatrixError> {
        config.validate()?;
        Ok(Self {
            engine,
            concurrency: config.concurrency,
        })
    }

    /// One result per origin that has at least one destination, in origin
    /// order. A route the engine cannot provide is replaced by a straight line.
    pub async fn for_each_origin(&self, matrix: &DistanceMatrix) -> Vec<RouteResult> {
        let selections: Vec<(usize, usize)> = matrix
            .rows()
            .enumerate()
            .filter_map(|(origin, row)| {
                farthest_destination(row).map(|destination| (origin, destination))
            })
            .collect();

        stream::iter(selections)
            .map(|(origin, destination)| self.route(matrix, origin, destination))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn route(
        &self,
        matrix: &DistanceMatrix,
        origin_index: usize,
        destination_index: usize,
    ) -> RouteResult {
        let origin = (origin_index, matrix.origins()[origin_index]);
        let destination = (destination_index, matrix.destinations()[destination_index]);

        debug!(
            "FarthestRouteSelector: routing origin {} to destination {}",
            origin_index, destination_index
        );

        match self.engine.fetch_route(origin.1, destination.1).await {
            Ok(route) if is_usable(&route) => {
                RouteResult::routed(origin, destination, route)
            }
            Ok(route) => {
                warn!(
                    "FarthestRouteSelector: unusable route from {} to {} ({} points, {} m, {}), using a straight line",
                    origin_index,
                    destination_index,
                    route.geometry.len(),
                    route.distance,
                    route.duration
                );
                RouteResult::fallback(origin, destination)
            }
            Err(err) => {
                warn!(
                    "FarthestRouteSelector: route from {} to {} failed: {}, using a straight line",
                    origin_index, destination_index, err
                );
                RouteResult::fallback(origin, destination)
            }
        }
    }
}
