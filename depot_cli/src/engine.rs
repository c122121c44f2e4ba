use std::time::Duration;

use clap::{Args, ValueEnum};
use depot_matrix::{
    costing::Costing,
    geo_point::GeoPoint,
    matrix_config::{
        DEFAULT_CONCURRENCY, DEFAULT_MAX_COMBINED, EngineConfig, MatrixConfig,
    },
    routing_engine::{Grid, Route, RoutingEngine, TableRequest},
};
use depot_osrm::{OsrmClient, OsrmError};
use depot_valhalla::{ValhallaClient, ValhallaError};
use thiserror::Error;

use crate::parsers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    Osrm,
    Valhalla,
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Routing engine protocol
    #[arg(long, value_enum, env = "DEPOT_ENGINE", default_value_t = EngineKind::Osrm)]
    pub engine: EngineKind,

    /// Base url of the routing engine
    #[arg(long, env = "DEPOT_ENGINE_URL", default_value = "http://localhost:5000")]
    pub url: String,

    /// Travel mode (car, bike, foot, truck)
    #[arg(long, env = "DEPOT_COSTING", default_value = "car")]
    pub costing: Costing,

    /// Maximum number of coordinates (origins + destinations) per table request
    #[arg(long, env = "DEPOT_MAX_COMBINED", default_value_t = DEFAULT_MAX_COMBINED)]
    pub max_combined: usize,

    /// Maximum number of requests in flight
    #[arg(long, env = "DEPOT_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Timeout of a table request (e.g., "600s", "10m")
    #[arg(long, env = "DEPOT_TABLE_TIMEOUT", value_parser = parsers::parse_timeout, default_value = "600s")]
    pub table_timeout: Duration,

    /// Timeout of a route request
    #[arg(long, env = "DEPOT_ROUTE_TIMEOUT", value_parser = parsers::parse_timeout, default_value = "30s")]
    pub route_timeout: Duration,
}

impl EngineArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.url.clone())
            .with_costing(self.costing)
            .with_table_timeout(self.table_timeout)
            .with_route_timeout(self.route_timeout)
    }

    pub fn matrix_config(&self) -> MatrixConfig {
        MatrixConfig {
            max_combined: self.max_combined,
            concurrency: self.concurrency,
        }
    }

    pub fn client(&self) -> anyhow::Result<EngineClient> {
        let config = self.engine_config();
        config.validate()?;

        Ok(match self.engine {
            EngineKind::Osrm => EngineClient::Osrm(OsrmClient::new(config)),
            EngineKind::Valhalla => EngineClient::Valhalla(ValhallaClient::new(config)),
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineClientError {
    #[error(transparent)]
    Osrm(#[from] OsrmError),

    #[error(transparent)]
    Valhalla(#[from] ValhallaError),
}

/// The engine selected on the command line.
#[derive(Clone)]
pub enum EngineClient {
    Osrm(OsrmClient),
    Valhalla(ValhallaClient),
}

impl RoutingEngine for EngineClient {
    type Error = EngineClientError;

    async fn fetch_table(&self, request: TableRequest<'_>) -> Result<Grid, EngineClientError> {
        match self {
            EngineClient::Osrm(client) => Ok(client.fetch_table(request).await?),
            EngineClient::Valhalla(client) => Ok(client.fetch_table(request).await?),
        }
    }

    async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Route, EngineClientError> {
        match self {
            EngineClient::Osrm(client) => Ok(client.fetch_route(origin, destination).await?),
            EngineClient::Valhalla(client) => Ok(client.fetch_route(origin, destination).await?),
        }
    }
}
