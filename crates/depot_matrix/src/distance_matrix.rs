use crate::{distance_cell::DistanceCell, geo_point::GeoPoint, routing_engine::ShapeMismatch};

/// Origin × destination distances, stored as a flat vector.
/// The cell for a pair is at `origin * num_destinations + destination`, rows and
/// columns follow the order of the input points.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    origins: Vec<GeoPoint>,
    destinations: Vec<GeoPoint>,
    cells: Vec<DistanceCell>,
}

impl DistanceMatrix {
    /// A matrix where every cell is still unresolved
    pub fn new(origins: Vec<GeoPoint>, destinations: Vec<GeoPoint>) -> Self {
        let cells = vec![DistanceCell::Unresolved; origins.len() * destinations.len()];
        Self {
            origins,
            destinations,
            cells,
        }
    }

    /// Builds a fully resolved matrix from nested rows of distances in meters.
    pub fn from_rows(
        origins: Vec<GeoPoint>,
        destinations: Vec<GeoPoint>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ShapeMismatch> {
        if rows.len() != origins.len() || rows.iter().any(|row| row.len() != destinations.len()) {
            return Err(ShapeMismatch {
                expected_origins: origins.len(),
                expected_destinations: destinations.len(),
                origins: rows.len(),
                destinations: rows.first().map(Vec::len).unwrap_or(0),
            });
        }

        let cells = rows
            .into_iter()
            .flatten()
            .map(|distance| DistanceCell::Resolved {
                distance,
                time: None,
            })
            .collect();

        Ok(Self {
            origins,
            destinations,
            cells,
        })
    }

    #[inline(always)]
    fn index(&self, origin: usize, destination: usize) -> usize {
        origin * self.destinations.len() + destination
    }

    pub fn num_origins(&self) -> usize {
        self.origins.len()
    }

    pub fn num_destinations(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn origins(&self) -> &[GeoPoint] {
        &self.origins
    }

    pub fn destinations(&self) -> &[GeoPoint] {
        &self.destinations
    }

    pub fn cell(&self, origin: usize, destination: usize) -> DistanceCell {
        self.cells[self.index(origin, destination)]
    }

    pub fn distance(&self, origin: usize, destination: usize) -> Option<f64> {
        self.cell(origin, destination).distance()
    }

    pub(crate) fn set(&mut self, origin: usize, destination: usize, cell: DistanceCell) {
        let index = self.index(origin, destination);
        self.cells[index] = cell;
    }

    pub fn row(&self, origin: usize) -> &[DistanceCell] {
        let width = self.destinations.len();
        &self.cells[origin * width..(origin + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[DistanceCell]> {
        (0..self.num_origins()).map(move |origin| self.row(origin))
    }

    pub fn cells(&self) -> &[DistanceCell] {
        &self.cells
    }

    pub fn resolved_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, DistanceCell::Resolved { .. }))
            .count()
    }

    pub fn estimated_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_estimated()).count()
    }
}
