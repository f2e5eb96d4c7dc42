use crate::demo::{
    run_deals, run_demo, run_explore, run_mortgage, DealsArgs, DemoArgs, ExploreArgs,
    MortgageCommandArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use israstat::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "israstat",
    about = "Israeli mortgage affordability and neighborhood deal explorer",
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
    /// Estimate the maximum affordable property price
    Mortgage(MortgageCommandArgs),
    /// Generate comparable deals for a neighborhood
    Deals(DealsArgs),
    /// List neighborhoods within reach of a mortgage estimate
    Explore(ExploreArgs),
    /// Walk through affordability, opportunities and deal browsing end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Mortgage(args) => run_mortgage(args),
        Command::Deals(args) => run_deals(args),
        Command::Explore(args) => run_explore(args),
        Command::Demo(args) => run_demo(args),
    }
}
