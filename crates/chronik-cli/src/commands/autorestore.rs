//! Cloud storage automated recovery commands.

use crate::{
    config::{self, ConnectionArgs},
    output, OutputFormat,
};
use anyhow::Result;
use chronik_admin_client::{
    AdminClientError, AdminTransport, RecoveryClient, RecoveryStartResult, RecoveryStatus,
};
use clap::Subcommand;
use std::time::Duration;

/// Pattern used when `--topic-name-pattern` is not given.
pub const DEFAULT_TOPIC_NAME_PATTERN: &str = ".*";

/// Interact with the autorestore process
#[derive(Debug, clap::Parser)]
pub struct AutorestoreCommand {
    #[command(subcommand)]
    command: AutorestoreSubcommands,
}

#[derive(Debug, Subcommand)]
enum AutorestoreSubcommands {
    /// Start the autorestore process
    Start {
        /// A regex pattern to match topic names against. Only topics whose
        /// names match this pattern will be restored. If not passed, all
        /// topics will be restored.
        #[arg(
            long,
            default_value = DEFAULT_TOPIC_NAME_PATTERN,
            value_parser = clap::builder::NonEmptyStringValueParser::new()
        )]
        topic_name_pattern: String,
    },

    /// Fetch the status of the autorestore process
    Status {
        /// Print everything the cluster reports, not just the state
        #[arg(short, long)]
        detailed: bool,

        /// Keep polling and print each state change until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Seconds between polls with --watch
        #[arg(
            long,
            default_value = "5",
            requires = "watch",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: u64,
    },
}

impl AutorestoreCommand {
    pub async fn execute(&self, connection: &ConnectionArgs, format: OutputFormat) -> Result<()> {
        let config = config::load(connection)
            .unwrap_or_else(|e| output::die(&format!("unable to load config: {e:#}")));
        let client = RecoveryClient::connect(&config)
            .unwrap_or_else(|e| output::die(&format!("unable to initialize admin client: {e}")));

        match &self.command {
            AutorestoreSubcommands::Start { topic_name_pattern } => {
                let result = start(&client, topic_name_pattern)
                    .await
                    .unwrap_or_else(|message| output::die(&message));

                match format {
                    OutputFormat::Text => println!("Successfully started auto-restore"),
                    _ => println!("{}", output::format_output(&result, format)?),
                }
            }
            AutorestoreSubcommands::Status {
                detailed,
                watch,
                interval,
            } => {
                if *watch {
                    watch_status(&client, *detailed, format, Duration::from_secs(*interval))
                        .await?;
                } else {
                    let status = poll(&client)
                        .await
                        .unwrap_or_else(|message| output::die(&message));
                    print_status(&status, *detailed, format)?;
                }
            }
        }

        Ok(())
    }
}

/// Start recovery, mapping failures to the message shown to the operator.
async fn start<T: AdminTransport>(
    client: &RecoveryClient<T>,
    topic_name_pattern: &str,
) -> std::result::Result<RecoveryStartResult, String> {
    client
        .start_automated_recovery(topic_name_pattern)
        .await
        .map_err(|e| start_failure_message(&e))
}

async fn poll<T: AdminTransport>(
    client: &RecoveryClient<T>,
) -> std::result::Result<RecoveryStatus, String> {
    client
        .poll_automated_recovery_status()
        .await
        .map_err(|e| format!("unable to fetch auto-restore status: {e}"))
}

/// 404 and 400 carry a `{"message"}` body worth showing on its own. Anything
/// else, including bodies that don't decode, is shown as the raw error.
fn start_failure_message(err: &AdminClientError) -> String {
    if let AdminClientError::HttpStatus(http) = err {
        if let Ok(body) = http.decode_generic_error_body() {
            match http.status {
                404 => return format!("Not found: {}", body.message),
                400 => return format!("Cannot start auto-restore: {}", body.message),
                _ => {}
            }
        }
    }
    format!("error starting auto-restore: {err}")
}

fn render_status(status: &RecoveryStatus, detailed: bool) -> String {
    let mut out = format!("Auto-restore status: {}", status.state);
    if detailed {
        for (key, value) in &status.details {
            match value {
                serde_json::Value::String(s) => out.push_str(&format!("\n  {key}: {s}")),
                other => out.push_str(&format!("\n  {key}: {other}")),
            }
        }
    }
    out
}

fn print_status(status: &RecoveryStatus, detailed: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_status(status, detailed)),
        _ => println!("{}", output::format_output(status, format)?),
    }
    Ok(())
}

async fn watch_status<T: AdminTransport>(
    client: &RecoveryClient<T>,
    detailed: bool,
    format: OutputFormat,
    interval: Duration,
) -> Result<()> {
    output::print_info(&format!(
        "Polling auto-restore status every {}s, Ctrl-C to stop",
        interval.as_secs()
    ));

    let mut last: Option<RecoveryStatus> = None;
    loop {
        let status = poll(client)
            .await
            .unwrap_or_else(|message| output::die(&message));
        if has_changed(last.as_ref(), &status, detailed) {
            print_status(&status, detailed, format)?;
        }
        last = Some(status);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// Without `--detailed` only the state counts as a change.
fn has_changed(last: Option<&RecoveryStatus>, current: &RecoveryStatus, detailed: bool) -> bool {
    match last {
        None => true,
        Some(last) if detailed => last != current,
        Some(last) => last.state != current.state,
    }
}
