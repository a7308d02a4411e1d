/// Logging configuration.
///
/// Logs go to stderr, and optionally to `{log_dir}/chatstats.log`, where
/// each run appends after a separator line.
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "chatstats.log";

/// Initializes logging for one run.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file; stderr only when `None`
/// * `verbose` - Default to `debug` instead of `info` (`RUST_LOG` still wins)
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            write_run_separator(dir);

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_target(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    tracing::debug!("Logging initialized");

    Ok(())
}

fn write_run_separator(dir: &Path) {
    let separator = format!(
        "\n{sep}\n[{ts}] New run\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );

    use std::io::Write;
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
    {
        let _ = writeln!(file, "{}", separator);
    }
}
