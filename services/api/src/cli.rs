use clap::{Args, Parser, Subcommand};
use fleet_sla::error::AppError;

use crate::demo::{run_demo, run_sla_evaluation, DemoArgs, EvaluateArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet SLA Calculator",
    about = "Run the fleet maintenance SLA service or evaluate turnarounds from the command line",
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
    /// SLA calculations without the HTTP service
    Sla {
        #[command(subcommand)]
        command: SlaCommand,
    },
    /// Run an end-to-end CLI demo covering evaluation and comparison
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SlaCommand {
    /// Evaluate one maintenance window against its SLA threshold
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Username of the bootstrap superadmin account
    #[arg(long, default_value = "fleet.admin")]
    pub(crate) superadmin_username: String,
    /// E-mail of the bootstrap superadmin account
    #[arg(long, default_value = "fleet.admin@frota.example")]
    pub(crate) superadmin_email: String,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            superadmin_username: "fleet.admin".to_string(),
            superadmin_email: "fleet.admin@frota.example".to_string(),
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Sla {
            command: SlaCommand::Evaluate(args),
        } => run_sla_evaluation(args),
        Command::Demo(args) => run_demo(args),
    }
}
