//! Output formatting utilities.

use crate::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Render a result object as JSON or YAML.
///
/// Text output is command specific, so `Text` falls back to pretty JSON.
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?.trim_end().to_string()),
        OutputFormat::Json | OutputFormat::Text => Ok(serde_json::to_string_pretty(data)?),
    }
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Print `message` to stderr and exit with status 1.
pub fn die(message: &str) -> ! {
    print_error(message);
    std::process::exit(1)
}
