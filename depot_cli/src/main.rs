use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{farthest::FarthestArgs, matrix::MatrixArgs};

mod engine;
mod farthest;
mod input;
mod matrix;
mod output;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Road distances between every origin and every destination
    #[command(visible_alias = "m")]
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
    /// Route from every origin to its farthest destination
    #[command(visible_alias = "f")]
    Farthest {
        #[command(flatten)]
        args: FarthestArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // a missing .env file is fine, the environment may already be set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Matrix { args } => matrix::run(args).await?,
        Commands::Farthest { args } => farthest::run(args).await?,
    }

    Ok(())
}
