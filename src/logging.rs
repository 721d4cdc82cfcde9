use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize file based logging.
///
/// The terminal belongs to the dashboard, so everything goes to `log_file`:
/// - no ansi colors, line numbers included.
/// - a single file that is appended to, never rotated.
/// - filtered by `filter`, a `RUST_LOG` style directive.
///
/// The returned guard flushes the writer when dropped; keep it alive for
/// the whole run.
pub fn init(log_file: &Path, filter: &str) -> Result<non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter `{filter}`"))?;
    let (dir, file_name) = split_log_path(log_file)?;

    let (file_logger, guard) = non_blocking(rolling::never(dir, file_name));
    let file_layer = fmt::Layer::new()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(file_logger)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(guard)
}

fn split_log_path(log_file: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log file `{}` has no file name", log_file.display()))?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, PathBuf::from(file_name)))
}
