use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use depot_matrix::geo_point::GeoPoint;
use serde::{Deserialize, Serialize};

/// A named location: a shipment origin or a candidate warehouse.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Site {
    pub name: Option<String>,
    #[serde(flatten)]
    pub point: GeoPoint,
}

impl Site {
    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{index}"))
    }
}

#[derive(Debug, Deserialize)]
pub struct Problem {
    pub origins: Vec<Site>,
    pub destinations: Vec<Site>,
}

impl Problem {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        let problem = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(problem)
    }

    pub fn origin_points(&self) -> Vec<GeoPoint> {
        self.origins.iter().map(|site| site.point).collect()
    }

    pub fn destination_points(&self) -> Vec<GeoPoint> {
        self.destinations.iter().map(|site| site.point).collect()
    }
}
