use std::path::Path;
use std::time::Duration;

use miette::{Context as _, IntoDiagnostic as _};
use tracing::debug;

pub mod model;

pub use model::*;

pub const API_URL_ENV_VAR: &str = "WEBSEC_API_URL";

impl RootConfig {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Self = toml::from_str(&contents)
            .into_diagnostic()
            .with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> miette::Result<()> {
        let contents = toml::to_string_pretty(self).into_diagnostic()?;
        std::fs::write(path, contents)
            .into_diagnostic()
            .context("saving websec config.toml file")?;
        Ok(())
    }

    /// Applies the environment and command line overrides for the backend
    /// origin. The flag wins over the environment variable.
    pub fn with_overrides(mut self, api_url: Option<String>) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                self.api.url = url;
            }
        }

        if let Some(url) = api_url {
            self.api.url = url;
        }

        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms.max(1))
    }
}

/// Loads the global config, writing the defaults on first run.
pub fn ensure_global_config() -> miette::Result<RootConfig> {
    let path = crate::home::config_path()?;

    if path.exists() {
        return RootConfig::load(&path);
    }

    debug!(path = %path.display(), "writing default config");

    let config = RootConfig::default();
    config.save(&path)?;

    Ok(config)
}
