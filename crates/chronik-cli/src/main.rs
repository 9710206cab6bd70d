//! Chronik Stream CLI tool.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;
mod telemetry;

use commands::*;
use config::ConnectionArgs;

/// Chronik Stream command-line tool
#[derive(Parser)]
#[command(name = "chronik-ctl")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    output: OutputFormat,

    /// Log admin API traffic to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Topic management
    Topic(TopicCommand),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init(cli.verbose);

    match cli.command {
        Commands::Topic(cmd) => cmd.execute(&cli.connection, cli.output).await?,
    }

    Ok(())
}
