use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use crate::{
    chunk_planner::{self, Chunk},
    distance_cell::DistanceCell,
    distance_matrix::DistanceMatrix,
    error::MatrixError,
    fallback,
    geo_point::GeoPoint,
    matrix_config::MatrixConfig,
    routing_engine::{Grid, RoutingEngine, TableRequest},
};

/// Computes complete distance matrices of any size against a [`RoutingEngine`]
/// whose table endpoint only accepts a limited number of coordinates.
pub struct MatrixEngine<E> {
    engine: E,
    config: MatrixConfig,
}

impl<E> MatrixEngine<E>
where
    E: RoutingEngine,
{
    pub fn new(engine: E, config: MatrixConfig) -> Result<Self, MatrixError> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// Every cell of the returned matrix holds a distance: either the one
    /// reported by the engine or an estimate when the engine could not
    /// resolve it.
    pub async fn compute(
        &self,
        origins: &[GeoPoint],
        destinations: &[GeoPoint],
    ) -> Result<DistanceMatrix, MatrixError> {
        let mut matrix = DistanceMatrix::new(origins.to_vec(), destinations.to_vec());

        if matrix.is_empty() {
            return Ok(matrix);
        }

        let chunks = chunk_planner::plan(
            origins.len(),
            destinations.len(),
            self.config.max_combined,
        )?;

        debug!(
            "MatrixEngine: {}x{} matrix split into {} chunks",
            origins.len(),
            destinations.len(),
            chunks.len()
        );

        let mut results = stream::iter(chunks.iter())
            .map(|chunk| async move {
                let request = TableRequest::new(chunk, origins, destinations);
                let result = self.engine.fetch_table(request).await;
                (chunk, result)
            })
            .buffer_unordered(self.config.concurrency);

        let mut failed_chunks = 0;
        while let Some((chunk, result)) = results.next().await {
            match result {
                Ok(grid) => {
                    if let Err(message) = write_grid(&mut matrix, chunk, &grid) {
                        failed_chunks += 1;
                        warn!("MatrixEngine: ignoring chunk {:?}: {}", chunk, message);
                    }
                }
                Err(err) => {
                    failed_chunks += 1;
                    warn!(
                        "MatrixEngine: chunk origins {:?} destinations {:?} failed: {}",
                        chunk.origins(),
                        chunk.destinations(),
                        err
                    );
                }
            }
        }

        let estimated = estimate_unresolved(&mut matrix);

        info!(
            "MatrixEngine: {} cells resolved, {} estimated, {}/{} chunks failed",
            matrix.resolved_count(),
            estimated,
            failed_chunks,
            chunks.len()
        );

        Ok(matrix)
    }
}

fn write_grid(matrix: &mut DistanceMatrix, chunk: &Chunk, grid: &Grid) -> Result<(), String> {
    if grid.num_origins() != chunk.num_origins()
        || grid.num_destinations() != chunk.num_destinations()
    {
        return Err(format!(
            "expected {}x{} cells, got {}x{}",
            chunk.num_origins(),
            chunk.num_destinations(),
            grid.num_origins(),
            grid.num_destinations()
        ));
    }

    for (row, origin) in chunk.origins().enumerate() {
        for (column, destination) in chunk.destinations().enumerate() {
            if let Some(measurement) = grid.get(row, column) {
                matrix.set(origin, destination, measurement.into());
            }
        }
    }

    Ok(())
}

/// Replaces every unresolved cell by its estimate, returns how many were replaced.
fn estimate_unresolved(matrix: &mut DistanceMatrix) -> usize {
    let mut estimated = 0;

    for origin in 0..matrix.num_origins() {
        for destination in 0..matrix.num_destinations() {
            if matrix.cell(origin, destination).is_unresolved() {
                let distance = fallback::estimate(
                    &matrix.origins()[origin],
                    &matrix.destinations()[destination],
                );
                matrix.set(origin, destination, DistanceCell::Estimated { distance });
                estimated += 1;
            }
        }
    }

    estimated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        distance_cell::Measurement,
        haversine::haversine_distance,
        test_utils::{MockEngine, MockError, points},
    };

    fn engine(mock: MockEngine, max_combined: usize) -> MatrixEngine<MockEngine> {
        MatrixEngine::new(
            mock,
            MatrixConfig {
                max_combined,
                concurrency: 2,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn seven_by_six_in_four_requests() {
        let mock = MockEngine::constant(1.0);
        let engine = engine(mock.clone(), 10);

        let matrix = engine.compute(&points(7), &points(6)).await.unwrap();

        assert_eq!(matrix.num_origins(), 7);
        assert_eq!(matrix.num_destinations(), 6);
        assert!(matrix.cells().iter().all(|cell| cell.distance() == Some(1.0)));
        assert_eq!(matrix.resolved_count(), 42);
        assert_eq!(mock.table_calls(), 4);
    }

    #[tokio::test]
    async fn empty_inputs_do_not_call_the_engine() {
        let mock = MockEngine::constant(1.0);
        let engine = engine(mock.clone(), 10);

        let no_destinations = engine.compute(&points(3), &[]).await.unwrap();
        let no_origins = engine.compute(&[], &points(3)).await.unwrap();

        assert!(no_destinations.is_empty());
        assert_eq!(no_destinations.num_origins(), 3);
        assert!(no_origins.is_empty());
        assert_eq!(mock.table_calls(), 0);
    }

    #[tokio::test]
    async fn unavailable_engine_falls_back_everywhere() {
        let origins = points(4);
        let destinations = points(5);
        let engine = engine(MockEngine::unavailable(), 4);

        let matrix = engine.compute(&origins, &destinations).await.unwrap();

        for (i, origin) in origins.iter().enumerate() {
            for (j, destination) in destinations.iter().enumerate() {
                let expected = haversine_distance(origin, destination) * 1.3;
                let cell = matrix.cell(i, j);
                assert!(cell.is_estimated());
                assert!((cell.distance().unwrap() - expected).abs() < 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn single_failed_request_is_estimated() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        let destination = GeoPoint::new(0.0, 1.0).unwrap();
        let engine = engine(MockEngine::unavailable(), 2);

        let matrix = engine.compute(&[origin], &[destination]).await.unwrap();

        let distance = matrix.distance(0, 0).unwrap();
        assert!((distance - 144_554.0).abs() < 1_445.0, "got {distance}");
    }

    #[tokio::test]
    async fn failed_chunk_only_affects_its_rectangle() {
        // chunk size 2: the chunk starting at origin 2, destination 0 fails
        let mock = MockEngine::new(
            |request| {
                if request.chunk.origins().start == 2 && request.chunk.destinations().start == 0 {
                    return Err(MockError("timeout".to_string()));
                }
                Ok(Grid::filled(
                    request.origins.len(),
                    request.destinations.len(),
                    Some(Measurement {
                        distance: 5.0,
                        time: None,
                    }),
                ))
            },
            |_, _| Err(MockError("no route".to_string())),
        );
        let engine = engine(mock.clone(), 4);

        let matrix = engine.compute(&points(3), &points(3)).await.unwrap();

        assert_eq!(mock.table_calls(), 4);
        for i in 0..3 {
            for j in 0..3 {
                let cell = matrix.cell(i, j);
                if i == 2 && j < 2 {
                    assert!(cell.is_estimated(), "({i}, {j}) should be estimated");
                } else {
                    assert_eq!(cell.distance(), Some(5.0), "({i}, {j})");
                }
            }
        }
    }

    #[tokio::test]
    async fn cells_are_written_at_their_true_position() {
        // distance encodes the global position of the cell
        let mock = MockEngine::new(
            |request| {
                let rows = request
                    .chunk
                    .origins()
                    .map(|i| {
                        request
                            .chunk
                            .destinations()
                            .map(|j| {
                                Measurement::checked(Some((i * 100 + j) as f64), None)
                            })
                            .collect()
                    })
                    .collect();
                Grid::from_rows(rows, request.origins.len(), request.destinations.len())
                    .map_err(|err| MockError(err.to_string()))
            },
            |_, _| Err(MockError("no route".to_string())),
        );
        let engine = engine(mock, 6);

        let matrix = engine.compute(&points(8), &points(7)).await.unwrap();

        for i in 0..8 {
            for j in 0..7 {
                assert_eq!(matrix.distance(i, j), Some((i * 100 + j) as f64));
            }
        }
    }

    #[tokio::test]
    async fn unresolved_pairs_inside_a_successful_chunk_are_estimated() {
        let mock = MockEngine::new(
            |request| {
                let rows = (0..request.origins.len())
                    .map(|i| {
                        (0..request.destinations.len())
                            .map(|j| Measurement::checked((i != j).then_some(10.0), None))
                            .collect()
                    })
                    .collect();
                Grid::from_rows(rows, request.origins.len(), request.destinations.len())
                    .map_err(|err| MockError(err.to_string()))
            },
            |_, _| Err(MockError("no route".to_string())),
        );
        let engine = engine(mock, 100);

        let matrix = engine.compute(&points(3), &points(3)).await.unwrap();

        assert_eq!(matrix.estimated_count(), 3);
        assert_eq!(matrix.resolved_count(), 6);
        assert!(matrix.cell(1, 1).is_estimated());
        assert_eq!(matrix.cell(1, 2).distance(), Some(10.0));
    }

    #[tokio::test]
    async fn wrong_shape_is_treated_as_a_failed_chunk() {
        let mock = MockEngine::new(
            |_| Ok(Grid::filled(1, 1, Some(Measurement { distance: 3.0, time: None }))),
            |_, _| Err(MockError("no route".to_string())),
        );
        let engine = engine(mock, 100);

        let matrix = engine.compute(&points(2), &points(2)).await.unwrap();

        assert_eq!(matrix.estimated_count(), 4);
    }

    #[tokio::test]
    async fn repeated_computations_are_identical() {
        let engine = engine(MockEngine::constant(2.5), 6);
        let origins = points(9);
        let destinations = points(4);

        let first = engine.compute(&origins, &destinations).await.unwrap();
        let second = engine.compute(&origins, &destinations).await.unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = MatrixEngine::new(
            MockEngine::constant(1.0),
            MatrixConfig {
                max_combined: 1,
                concurrency: 1,
            },
        );

        assert!(matches!(result, Err(MatrixError::Configuration(_))));
    }
}
