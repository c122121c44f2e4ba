use std::{path::PathBuf, time::Duration};

use clap::Args;
use depot_matrix::{distance_matrix::DistanceMatrix, matrix_engine::MatrixEngine};
use indicatif::ProgressBar;
use tracing::info;

use crate::{
    engine::{EngineArgs, EngineClient},
    input::Problem,
    output,
};

#[derive(Args)]
pub struct MatrixArgs {
    /// JSON file with the origins and destinations
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the matrix as JSON into this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Computes the matrix for the problem, showing a spinner while requests are in flight.
pub async fn compute(
    engine: &MatrixEngine<EngineClient>,
    problem: &Problem,
) -> anyhow::Result<DistanceMatrix> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Computing {}x{} matrix",
        problem.origins.len(),
        problem.destinations.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let matrix = engine
        .compute(&problem.origin_points(), &problem.destination_points())
        .await;

    spinner.finish_and_clear();

    let matrix = matrix?;
    info!(
        "Matrix computed: {} resolved, {} estimated",
        matrix.resolved_count(),
        matrix.estimated_count()
    );

    Ok(matrix)
}

pub async fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let problem = Problem::from_file(&args.input)?;
    let engine = MatrixEngine::new(args.engine.client()?, args.engine.matrix_config())?;

    let matrix = compute(&engine, &problem).await?;

    println!("{}", output::matrix_table(&problem, &matrix));

    if let Some(path) = args.output {
        output::write_matrix(&path, &problem, &matrix)?;
        info!("Matrix written to {}", path.display());
    }

    Ok(())
}
