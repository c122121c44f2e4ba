use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    distance_cell::Measurement,
    geo_point::GeoPoint,
    routing_engine::{Grid, Route, RoutingEngine, TableRequest},
};

#[derive(Debug, Error)]
#[error("mock engine failure: {0}")]
pub struct MockError(pub String);

type TableFn = dyn Fn(&TableRequest<'_>) -> Result<Grid, MockError> + Send + Sync;
type RouteFn = dyn Fn(GeoPoint, GeoPoint) -> Result<Route, MockError> + Send + Sync;

/// Deterministic in-memory engine. Clones share their call counters.
#[derive(Clone)]
pub struct MockEngine {
    table: Arc<TableFn>,
    route: Arc<RouteFn>,
    table_calls: Arc<AtomicUsize>,
    route_calls: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new(
        table: impl Fn(&TableRequest<'_>) -> Result<Grid, MockError> + Send + Sync + 'static,
        route: impl Fn(GeoPoint, GeoPoint) -> Result<Route, MockError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            table: Arc::new(table),
            route: Arc::new(route),
            table_calls: Arc::new(AtomicUsize::new(0)),
            route_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every table cell has the same distance, every route fails.
    pub fn constant(distance: f64) -> Self {
        Self::new(
            move |request| {
                Ok(Grid::filled(
                    request.origins.len(),
                    request.destinations.len(),
                    Some(Measurement {
                        distance,
                        time: Some(distance / 10.0),
                    }),
                ))
            },
            |_, _| Err(MockError("no route".to_string())),
        )
    }

    /// Every call fails.
    pub fn unavailable() -> Self {
        Self::new(
            |_| Err(MockError("connection refused".to_string())),
            |_, _| Err(MockError("connection refused".to_string())),
        )
    }

    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }
}

impl RoutingEngine for MockEngine {
    type Error = MockError;

    async fn fetch_table(&self, request: TableRequest<'_>) -> Result<Grid, MockError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        (self.table)(&request)
    }

    async fn fetch_route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Route, MockError> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        (self.route)(origin, destination)
    }
}

/// A straight route through the midpoint, 1 km and 1 minute long.
pub fn three_point_route(origin: GeoPoint, destination: GeoPoint) -> Route {
    let midpoint = GeoPoint::new(
        (origin.lat() + destination.lat()) / 2.0,
        (origin.lon() + destination.lon()) / 2.0,
    )
    .unwrap();

    Route {
        geometry: vec![origin, midpoint, destination],
        distance: 1_000.0,
        duration: SignedDuration::from_mins(1),
    }
}

/// `count` distinct points along a diagonal.
pub fn points(count: usize) -> Vec<GeoPoint> {
    (0..count)
        .map(|i| GeoPoint::new(i as f64 * 0.5, i as f64 * 0.25).unwrap())
        .collect()
}
