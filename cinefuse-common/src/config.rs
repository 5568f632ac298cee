//! Configuration file discovery, data directory resolution and atomic writes
//!
//! # Resolution priority
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error: callers get `None` and a warning is
//! logged. A TOML file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "cinefuse";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "cinefuse.toml";

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "CINEFUSE_DATA_DIR";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive string (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file location: `<config_dir>/cinefuse/cinefuse.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Get OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./cinefuse_data"))
}

/// Load and deserialize a TOML file.
///
/// # Returns
/// * `Ok(Some(config))` - file exists and parsed
/// * `Ok(None)` - file does not exist (warning logged)
///
/// # Errors
/// Returns `Error::Io` if the file exists but cannot be read, and
/// `Error::TomlParse` if its content is malformed.
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<T>(&content)?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(Some(config))
}

/// Resolve the data directory following the priority order above.
pub fn resolve_data_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Write bytes to `path` atomically (temp file + rename).
///
/// Parent directories are created as needed. Readers never observe a
/// partially written file: either the previous content or the new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    std::fs::write(&temp_path, bytes)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Serialize `value` as JSON and write it atomically.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    write_atomic(path, &bytes)
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
