use depot_matrix::{
    geo_point::{GeoPoint, GeoPointError},
    matrix_config::EngineConfig,
    routing_engine::{Grid, Route, RoutingEngine, ShapeMismatch, TableRequest},
};
use thiserror::Error;
use tracing::debug;

use crate::response::{RouteResponse, TableResponse};

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("OSRM error {code}: {message}")]
    Engine { code: String, message: String },

    #[error("No route found")]
    NoRoute,

    #[error(transparent)]
    Shape(#[from] ShapeMismatch),

    #[error("Invalid coordinate in response: {0}")]
    Coordinate(#[from] GeoPointError),

    #[error("Incomplete response")]
    IncompleteResponse,
}

pub const OSRM_TABLE_API_PATH: &str = "/table/v1/";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/";

/// Client for the OSRM HTTP API (table and route services).
#[derive(Clone)]
pub struct OsrmClient {
    config: EngineConfig,
    client: reqwest::Client,
}

fn join_coordinates<'a>(points: impl Iterator<Item = &'a GeoPoint>) -> String {
    points
        .map(|point| format!("{},{}", point.lon(), point.lat()))
        .collect::<Vec<_>>()
        .join(";")
}

fn join_positions(positions: std::ops::Range<usize>) -> String {
    positions
        .map(|position| position.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

impl OsrmClient {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn service_url(&self, path: &str, coordinates: &str) -> String {
        let mut url = self.config.base_url().to_string();
        url.push_str(path);
        url.push_str(self.config.costing.osrm_profile());
        url.push('/');
        url.push_str(coordinates);
        url
    }

    /// OSRM expects `;` separated lists in the query, they are written as is
    /// instead of going through the url encoder.
    pub fn table_url(&self, request: &TableRequest<'_>) -> String {
        let mut url = self.service_url(OSRM_TABLE_API_PATH, &join_coordinates(request.coordinates()));
        url.push_str(&format!(
            "?sources={}&destinations={}&annotations=distance,duration",
            join_positions(request.chunk.source_positions()),
            join_positions(request.chunk.target_positions()),
        ));
        url
    }

    pub fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint) -> String {
        let mut url = self.service_url(
            OSRM_ROUTE_API_PATH,
            &join_coordinates([origin, destination].into_iter()),
        );
        url.push_str("?overview=full&geometries=geojson");
        url
    }

    async fn get<T>(&self, url: String, timeout: std::time::Duration) -> Result<T, OsrmError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).timeout(timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OsrmError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

impl RoutingEngine for OsrmClient {
    type Error = OsrmError;

    async fn fetch_table(&self, request: TableRequest<'_>) -> Result<Grid, OsrmError> {
        let url = self.table_url(&request);

        debug!(
            "OsrmClient: table request with {} sources and {} destinations",
            request.origins.len(),
            request.destinations.len()
        );

        let response: TableResponse = self.get(url, self.config.table_timeout).await?;
        response.into_grid(request.origins.len(), request.destinations.len())
    }

    async fn fetch_route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Route, OsrmError> {
        let url = self.route_url(&origin, &destination);

        debug!("OsrmClient: route request {}", url);

        let response: RouteResponse = self.get(url, self.config.route_timeout).await?;
        response.into_route()
    }
}
