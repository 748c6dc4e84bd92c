use crate::demo::{run_plan, PlanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use parking_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Parking Coupon Planner",
    about = "Compute and serve discount coupon allocation plans for the parking portal fleet",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP planning service (default command)
    Serve(ServeArgs),
    /// Compute a redemption plan from snapshot exports and print it
    Plan(PlanArgs),
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
        Command::Plan(args) => run_plan(args),
    }
}
