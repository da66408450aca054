use crate::commands::{run_discover, run_import, run_picks, DiscoverArgs, ImportArgs, PicksArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use slctrips::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "SLCTrips",
    about = "Serve and explore the SLCTrips destination catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the discovery pipeline over a fixture file and print the page
    Discover(DiscoverArgs),
    /// Print today's featured picks with their seasonal scores
    Picks(PicksArgs),
    /// Upsert destinations from a CSV or JSON file into the hosted database
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve from a CSV/JSON fixture instead of the hosted database
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Discover(args) => run_discover(args),
        Command::Picks(args) => run_picks(args),
        Command::Import(args) => run_import(args).await,
    }
}
