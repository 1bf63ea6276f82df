//! netgraph CLI tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "netgraph")]
#[command(about = "Resolve LZA network-config.yaml into a network graph", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "NETGRAPH_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The two input documents shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to network-config.yaml
    #[arg(long, env = "NETGRAPH_NETWORK")]
    network: PathBuf,
    /// Path to replacements-config.yaml
    #[arg(long, env = "NETGRAPH_REPLACEMENTS")]
    replacements: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configuration and write the graph as JSON
    Resolve {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the network configuration with placeholders substituted
    Render {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Check that the configuration resolves and summarize the graph
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays clean
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Resolve { inputs, out } => {
            commands::resolve(&inputs, out.as_deref())?;
        }
        Commands::Render { inputs } => {
            commands::render(&inputs)?;
        }
        Commands::Validate { inputs } => {
            commands::validate(&inputs)?;
        }
    }

    Ok(())
}
