use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOG_SIZE: u64 = 1024 * 1024; // 1MB

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file. Used while the terminal belongs to the scene.
///
/// Returns a guard that must be kept alive until the program exits.
pub fn init_file(path: &Path, filter: &str) -> io::Result<WorkerGuard> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    truncate_if_needed(path)?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!("Logging to file: {}", path.display());
    Ok(guard)
}

/// Log to stderr, for commands that do not take over the terminal.
pub fn init_stderr(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(io::stderr)
        .init();
}

fn truncate_if_needed(path: &Path) -> io::Result<()> {
    if path.exists() && fs::metadata(path)?.len() > MAX_LOG_SIZE {
        File::create(path)?;
    }
    Ok(())
}
