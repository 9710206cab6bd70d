//! Topic management commands.

use super::AutorestoreCommand;
use crate::{config::ConnectionArgs, OutputFormat};
use anyhow::Result;
use clap::Subcommand;

/// Topic management commands
#[derive(Debug, clap::Parser)]
pub struct TopicCommand {
    #[command(subcommand)]
    command: TopicSubcommands,
}

#[derive(Debug, Subcommand)]
enum TopicSubcommands {
    /// Restore topics from cloud storage
    Autorestore(AutorestoreCommand),
}

impl TopicCommand {
    pub async fn execute(&self, connection: &ConnectionArgs, format: OutputFormat) -> Result<()> {
        match &self.command {
            TopicSubcommands::Autorestore(cmd) => cmd.execute(connection, format).await,
        }
    }
}
