//! Application configuration.

use std::path::Path;

use anyhow::{Context, Result};
use gymtask_progress::EvaluatorConfig;
use serde::Deserialize;
use tracing::debug;

/// File looked up inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Settings read from `<data-dir>/config.json`. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Progress evaluation tunables
    pub evaluator: EvaluatorConfig,

    /// Rows shown in dashboard rankings
    pub top_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            top_limit: 5,
        }
    }
}

impl AppConfig {
    /// Load from the data directory, or defaults if there is no config file.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => {
                let config = serde_json::from_str(&json)
                    .with_context(|| format!("invalid config file {}", path.display()))?;
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(AppConfig::load(dir.path()).await.unwrap(), AppConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "evaluator": { "month_end_window_days": 4 } }"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load(dir.path()).await.unwrap();
        assert_eq!(config.evaluator.month_end_window_days, 4);
        assert_eq!(config.evaluator.calories_per_exercise, 50);
        assert_eq!(config.top_limit, 5);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join(CONFIG_FILE), "{").await.unwrap();
        assert!(AppConfig::load(dir.path()).await.is_err());
    }
}
