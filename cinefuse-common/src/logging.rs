//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! every target. Output goes to stderr, or is appended to `logging.file`.

use crate::config::LoggingConfig;
use crate::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global fmt subscriber.
///
/// Later calls are ignored, so test binaries may call this from several tests.
///
/// # Errors
/// Returns `Error::Io` when the log file cannot be opened.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&config.level);

    match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }

    Ok(())
}
