//! Relay CLI — runs the five-phase prompt-chain workflow.
//!
//! Research → Analysis → Blueprint → Review → Marketing, each phase fed the
//! output of the one before it. Results land in
//! `workflow_outputs_<YYYYMMDD_HHMMSS>.txt`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relay_cli::commands;
use relay_cli::commands::workflow::RunOptions;

/// Relay CLI — sequential multi-agent prompt chain
#[derive(Parser)]
#[command(name = "relay", version, about = "Relay CLI — sequential multi-agent prompt chain")]
pub struct Cli {
    /// Load environment variables from this file instead of ./.env and ../.env
    #[arg(long, env = "RELAY_ENV_FILE", global = true)]
    env_file: Option<PathBuf>,

    /// YAML file overriding agent names and roles
    #[arg(long = "agents", env = "RELAY_AGENTS_FILE", global = true)]
    agents_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all five phases and save the results (default)
    Run {
        /// Directory the results file is written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Show prompt sizes and token usage per phase
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check configuration and the agent roster without calling the model
    Validate,

    /// List the agent roster
    Agents,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_core=warn,relay_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let loaded = relay_core::config::load_dotenv(cli.env_file.as_deref());
    if loaded.is_empty() {
        tracing::debug!("[CLI] No .env file loaded");
    }

    let agents_file = cli.agents_file;
    let mut stdout = std::io::stdout();

    let result = match cli.command.unwrap_or(Commands::Run {
        output_dir: PathBuf::from("."),
        verbose: false,
    }) {
        Commands::Run {
            output_dir,
            verbose,
        } => {
            let opts = RunOptions {
                output_dir,
                agents_file,
                verbose,
            };
            commands::workflow::run(&opts).await.map(|_| ())
        }
        Commands::Validate => commands::workflow::validate(agents_file.as_deref(), &mut stdout),
        Commands::Agents => commands::workflow::list_agents(agents_file.as_deref(), &mut stdout),
    };

    if let Err(e) = result {
        let _ = commands::print_failure(&e, &mut std::io::stderr());
        std::process::exit(commands::exit_code(&e));
    }
}
