use crate::demo::{run_demo, run_process, DemoArgs, ProcessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payout_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Policy Payout Processor",
    about = "Run the commission payout grid service and batch tooling from the command line",
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
    /// Process a JSON batch of extracted policy records into payout CSV
    Process(ProcessArgs),
    /// Run a CLI demo over a built-in sample batch
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
        Command::Process(args) => run_process(args),
        Command::Demo(args) => run_demo(args),
    }
}
