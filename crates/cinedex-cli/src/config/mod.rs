//! Application configuration module.
//!
//! Manages the TOML config file (catalog language, account backend URL,
//! browser tuning) and the locations of per-user data files.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_log_path, resolve_session_path};
