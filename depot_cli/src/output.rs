use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use comfy_table::{Table, presets::UTF8_FULL};
use depot_matrix::{
    distance_cell::DistanceCell, distance_matrix::DistanceMatrix, route_result::RouteResult,
};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;

use crate::input::{Problem, Site};

fn format_km(meters: f64) -> String {
    format!("{:.1}", meters / 1_000.0)
}

fn format_cell(cell: &DistanceCell) -> String {
    match cell {
        DistanceCell::Resolved { distance, .. } => format_km(*distance),
        DistanceCell::Estimated { distance } => format!("{}*", format_km(*distance)),
        DistanceCell::Unresolved => "-".to_string(),
    }
}

/// Distances in km, estimated cells are marked with `*`.
pub fn matrix_table(problem: &Problem, matrix: &DistanceMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![String::from("km")];
    header.extend(
        problem
            .destinations
            .iter()
            .enumerate()
            .map(|(index, site)| site.label(index)),
    );
    table.set_header(header);

    for (index, (site, row)) in problem.origins.iter().zip(matrix.rows()).enumerate() {
        let mut cells = vec![site.label(index)];
        cells.extend(row.iter().map(format_cell));
        table.add_row(cells);
    }

    table
}

pub fn routes_table(problem: &Problem, routes: &[RouteResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Origin",
        "Farthest destination",
        "Distance (km)",
        "Duration",
        "Source",
    ]);

    for route in routes {
        table.add_row(vec![
            problem.origins[route.origin_index].label(route.origin_index),
            problem.destinations[route.destination_index].label(route.destination_index),
            format_km(route.distance),
            format!("{:#}", route.duration),
            format!("{:?}", route.source),
        ]);
    }

    table
}

#[derive(Serialize)]
struct MatrixExport<'a> {
    origins: &'a [Site],
    destinations: &'a [Site],
    /// `distances[origin][destination]`, meters
    distances: Vec<&'a [DistanceCell]>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

pub fn write_matrix(path: &Path, problem: &Problem, matrix: &DistanceMatrix) -> anyhow::Result<()> {
    let export = MatrixExport {
        origins: &problem.origins,
        destinations: &problem.destinations,
        distances: matrix.rows().collect(),
    };

    write_json(path, &export)
}

pub fn route_feature(problem: &Problem, route: &RouteResult) -> Feature {
    let line: geo_types::LineString = route
        .geometry
        .iter()
        .copied()
        .map(geo_types::Coord::from)
        .collect();

    let mut properties = JsonObject::new();
    properties.insert(
        "origin".to_string(),
        problem.origins[route.origin_index]
            .label(route.origin_index)
            .into(),
    );
    properties.insert(
        "destination".to_string(),
        problem.destinations[route.destination_index]
            .label(route.destination_index)
            .into(),
    );
    properties.insert("distance".to_string(), route.distance.into());
    properties.insert(
        "duration".to_string(),
        route.duration.as_secs_f64().into(),
    );
    properties.insert(
        "source".to_string(),
        serde_json::to_value(route.source).unwrap_or_default(),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn write_routes(path: &Path, problem: &Problem, routes: &[RouteResult]) -> anyhow::Result<()> {
    let collection = FeatureCollection {
        bbox: None,
        features: routes
            .iter()
            .map(|route| route_feature(problem, route))
            .collect(),
        foreign_members: None,
    };

    write_json(path, &collection)
}
