/// Utility functions for the per-user state directory
use std::path::PathBuf;

use miette::{Context as _, IntoDiagnostic as _};

pub const HOME_ENV_VAR: &str = "WEBSEC_HOME";

fn custom_home_dir() -> Option<PathBuf> {
    let Ok(path) = std::env::var(HOME_ENV_VAR) else {
        return None;
    };

    if path.trim().is_empty() {
        return None;
    }

    Some(PathBuf::from(path))
}

pub fn websec_dir() -> miette::Result<PathBuf> {
    let home = match custom_home_dir() {
        Some(path) => path,
        None => dirs::home_dir()
            .ok_or_else(|| miette::miette!("failed to get home directory"))?
            .join(".websec"),
    };

    if !home.exists() {
        std::fs::create_dir_all(&home)
            .into_diagnostic()
            .context("failed to create websec home directory")?;
    }

    Ok(home)
}

pub fn config_path() -> miette::Result<PathBuf> {
    Ok(websec_dir()?.join("config.toml"))
}

pub fn session_path() -> miette::Result<PathBuf> {
    Ok(websec_dir()?.join("session.json"))
}
