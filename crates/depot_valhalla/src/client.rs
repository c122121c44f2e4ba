use std::time::Duration;

use depot_matrix::{
    geo_point::{GeoPoint, GeoPointError},
    matrix_config::EngineConfig,
    routing_engine::{Grid, Route, RoutingEngine, ShapeMismatch, TableRequest},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::response::{MatrixRequestBody, MatrixResponse, RouteRequestBody, RouteResponse};

#[derive(Debug, Error)]
pub enum ValhallaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No route found")]
    NoRoute,

    #[error(transparent)]
    Shape(#[from] ShapeMismatch),

    #[error("Invalid route shape: {0}")]
    Polyline(String),

    #[error(transparent)]
    Coordinate(#[from] GeoPointError),

    #[error("Incomplete response")]
    IncompleteResponse,
}

pub const VALHALLA_MATRIX_API_PATH: &str = "/sources_to_targets";
pub const VALHALLA_ROUTE_API_PATH: &str = "/route";

/// Distances are requested in kilometers and converted to meters on arrival.
const VALHALLA_UNITS: &str = "km";

/// Client for the Valhalla HTTP API (matrix and route services).
#[derive(Clone)]
pub struct ValhallaClient {
    config: EngineConfig,
    client: reqwest::Client,
}

impl ValhallaClient {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B, timeout: Duration) -> Result<T, ValhallaError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ValhallaError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

impl RoutingEngine for ValhallaClient {
    type Error = ValhallaError;

    async fn fetch_table(&self, request: TableRequest<'_>) -> Result<Grid, ValhallaError> {
        let body = MatrixRequestBody {
            sources: request.origins.iter().map(Into::into).collect(),
            targets: request.destinations.iter().map(Into::into).collect(),
            costing: self.config.costing.valhalla_costing(),
            units: VALHALLA_UNITS,
        };

        debug!(
            "ValhallaClient: matrix request with {} sources and {} targets",
            request.origins.len(),
            request.destinations.len()
        );

        let response: MatrixResponse = self
            .post(VALHALLA_MATRIX_API_PATH, &body, self.config.table_timeout)
            .await?;
        response.into_grid(request.origins.len(), request.destinations.len())
    }

    async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Route, ValhallaError> {
        let body = RouteRequestBody {
            locations: [(&origin).into(), (&destination).into()],
            costing: self.config.costing.valhalla_costing(),
            units: VALHALLA_UNITS,
        };

        debug!(
            "ValhallaClient: route request ({}, {}) -> ({}, {})",
            origin.lat(),
            origin.lon(),
            destination.lat(),
            destination.lon()
        );

        let response: RouteResponse = self
            .post(VALHALLA_ROUTE_API_PATH, &body, self.config.route_timeout)
            .await?;
        response.into_route()
    }
}
