//! Config and data directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/cinedex/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("cinedex")
        .join("config.toml"))
}

/// Resolves the data directory holding the session and log files.
///
/// - If `dir` is `Some`, returns `dir` itself.
/// - Otherwise returns `~/.local/share/cinedex`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_data_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("cinedex"))
}

/// Resolves the session file path (`{data_dir}/session.toml`).
///
/// # Errors
///
/// See [`resolve_data_dir`].
pub fn resolve_session_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_data_dir(dir)?.join("session.toml"))
}

/// Resolves the log file used while the TUI owns the terminal.
///
/// # Errors
///
/// See [`resolve_data_dir`].
pub fn resolve_log_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_data_dir(dir)?.join("cinedex.log"))
}
