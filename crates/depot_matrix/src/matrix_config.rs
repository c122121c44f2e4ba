use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{costing::Costing, error::MatrixError};

pub const DEFAULT_MAX_COMBINED: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_TABLE_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// How a matrix computation is split and scheduled.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// Maximum number of coordinates (origins + destinations) in one request
    pub max_combined: usize,

    /// Maximum number of requests in flight
    pub concurrency: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            max_combined: DEFAULT_MAX_COMBINED,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl MatrixConfig {
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.max_combined < 2 {
            return Err(MatrixError::Configuration(format!(
                "max_combined must be at least 2, got {}",
                self.max_combined
            )));
        }

        if self.concurrency == 0 {
            return Err(MatrixError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Connection settings shared by the engine clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    pub base_url: String,
    pub costing: Costing,
    pub table_timeout: Duration,
    pub route_timeout: Duration,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            costing: Costing::default(),
            table_timeout: DEFAULT_TABLE_TIMEOUT,
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
        }
    }

    pub fn with_costing(mut self, costing: Costing) -> Self {
        self.costing = costing;
        self
    }

    pub fn with_table_timeout(mut self, timeout: Duration) -> Self {
        self.table_timeout = timeout;
        self
    }

    pub fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout = timeout;
        self
    }

    /// Base url without the trailing slash, ready to have a path appended.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.base_url.is_empty() {
            return Err(MatrixError::Configuration(
                "engine base url is empty".to_string(),
            ));
        }

        if self.table_timeout.is_zero() || self.route_timeout.is_zero() {
            return Err(MatrixError::Configuration(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
