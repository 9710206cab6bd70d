use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing on stderr.
///
/// Uses `RUST_LOG` env var if set, otherwise `debug` with `--verbose` and
/// `warn` without it.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
