pub mod chunk_planner;
pub mod costing;
pub mod distance_cell;
pub mod distance_matrix;
pub mod error;
pub mod fallback;
pub mod farthest_route;
pub mod geo_point;
pub mod haversine;
pub mod matrix_config;
pub mod matrix_engine;
pub mod route_result;
pub mod routing_engine;

#[cfg(test)]
pub(crate) mod test_utils;
