use std::path::PathBuf;

use clap::Args;
use depot_matrix::{farthest_route::FarthestRouteSelector, matrix_engine::MatrixEngine};
use tracing::info;

use crate::{engine::EngineArgs, input::Problem, matrix, output};

#[derive(Args)]
pub struct FarthestArgs {
    /// JSON file with the origins and destinations
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the routes as a GeoJSON feature collection into this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn run(args: FarthestArgs) -> anyhow::Result<()> {
    let problem = Problem::from_file(&args.input)?;
    let client = args.engine.client()?;
    let config = args.engine.matrix_config();

    let engine = MatrixEngine::new(client.clone(), config)?;
    let selector = FarthestRouteSelector::new(client, &config)?;

    let distance_matrix = matrix::compute(&engine, &problem).await?;
    let routes = selector.for_each_origin(&distance_matrix).await;

    let fallbacks = routes.iter().filter(|route| route.is_fallback()).count();
    info!(
        "{} routes computed, {} estimated as straight lines",
        routes.len(),
        fallbacks
    );

    println!("{}", output::routes_table(&problem, &routes));

    if let Some(path) = args.output {
        output::write_routes(&path, &problem, &routes)?;
        info!("Routes written to {}", path.display());
    }

    Ok(())
}
