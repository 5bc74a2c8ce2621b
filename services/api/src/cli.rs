use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use transparency_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Product Transparency Service",
    about = "Run and demonstrate the product transparency intake service from the command line",
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
    /// Run an end-to-end intake demo against in-memory collaborators
    Demo(DemoArgs),
    /// Compute an offline transparency score for a draft JSON file
    Score(ScoreArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Score(args) => run_score(args),
    }
}
