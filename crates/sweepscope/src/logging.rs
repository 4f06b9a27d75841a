use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "sweepscope.log";

/// Maximum log file size before trimming (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size kept after trimming (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Trim the log file down to its last `KEEP_SIZE` bytes once it exceeds `MAX_LOG_SIZE`
fn trim_log_if_needed(log_path: &Path) -> std::io::Result<()> {
    let Ok(metadata) = fs::metadata(log_path) else {
        return Ok(());
    };
    if metadata.len() <= MAX_LOG_SIZE {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(metadata.len().saturating_sub(KEEP_SIZE)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Start at a line boundary
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log trimmed (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Directives used when `RUST_LOG` is unset: both crates at `level`
fn default_filter(level: &str) -> String {
    format!("sweepscope={level},sweepscope_core={level}")
}

/// Initialize logging to `{data_dir}/sweepscope.log`.
///
/// The terminal belongs to the UI, so nothing is logged to stdout or stderr.
/// The filter comes from `RUST_LOG` when set, else from `level`. The returned
/// guard flushes the background writer and must be held until exit.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    fs::create_dir_all(data_dir)
        .wrap_err_with(|| format!("creating data directory {}", data_dir.display()))?;

    let log_path = data_dir.join(LOG_FILE_NAME);
    if let Err(e) = trim_log_if_needed(&log_path) {
        eprintln!("Warning: Failed to trim log file: {e}");
    }

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .wrap_err("installing the log subscriber")?;

    tracing::info!(log_path = %log_path.display(), "sweepscope logging initialized");
    Ok(guard)
}
