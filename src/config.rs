use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Timings of the transient notification banners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTiming {
    /// Delay before a fresh banner switches to shown
    pub show_delay_ms: u64,
    /// Time from insertion until the banner starts leaving
    pub visible_ms: u64,
    /// Fade-out time before the banner is dropped
    pub remove_delay_ms: u64,
}

impl NotificationTiming {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }

    pub fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.remove_delay_ms)
    }
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            visible_ms: 3000,
            remove_delay_ms: 300,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every resource path hangs off, e.g. `http://host/api/v1`
    pub api_base: String,
    pub timeout_secs: u64,
    pub notifications: NotificationTiming,
}

impl ClientConfig {
    pub const API_BASE_ENV: &'static str = "CRITTER_BOARD_API_BASE";
    pub const TIMEOUT_ENV: &'static str = "CRITTER_BOARD_TIMEOUT_SECS";

    /// Loads the config file if it exists, then applies environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml_str(&raw)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup such as the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(Self::API_BASE_ENV) {
            self.api_base = base;
        }
        if let Some(raw) = lookup(Self::TIMEOUT_ENV) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                BoardError::ConfigError(format!("{} must be a number of seconds", Self::TIMEOUT_ENV))
            })?;
        }
        self.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(BoardError::ConfigError("api_base cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(BoardError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api/v1".to_string(),
            timeout_secs: 10,
            notifications: NotificationTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "http://127.0.0.1:8000/api/v1");
        assert_eq!(config.notifications.visible(), Duration::from_secs(3));
        assert_eq!(config.notifications.show_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base = "https://board.example.com/api/v1"

            [notifications]
            visible_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base, "https://board.example.com/api/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.notifications.visible_ms, 5000);
        assert_eq!(config.notifications.remove_delay_ms, 300);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = \"soon\""),
            Err(BoardError::ConfigError(_))
        ));
        assert!(ClientConfig::from_toml_str("api_base = \"\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ClientConfig::API_BASE_ENV, "http://10.0.0.2:9000/api/v1"),
            (ClientConfig::TIMEOUT_ENV, "30"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base, "http://10.0.0.2:9000/api/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ClientConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ClientConfig::TIMEOUT_ENV).then(|| "later".to_string())
        });
        assert!(matches!(result, Err(BoardError::ConfigError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("board.toml");
        std::fs::write(&path, "timeout_secs = 4\n").unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 4);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert!(!config.api_base.is_empty());
    }
}
