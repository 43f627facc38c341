use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Optional settings file. Every key has a built-in default and CLI flags
/// take precedence, so a missing file never blocks a run.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Wireless interface handed to the scan utility.
    #[serde(default)]
    pub interface: Option<String>,
    /// Continuous-mode interval in seconds.
    #[serde(default)]
    pub interval: Option<u64>,
    /// Alternate geolocation endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("wifi-locate").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_keys_are_optional() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.interface.is_none());
        assert!(config.interval.is_none());
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn parses_known_keys() {
        let config: Config = toml::from_str(
            "interface = \"wlan0\"\ninterval = 30\nendpoint = \"http://127.0.0.1:8080/loc/json\"\n",
        )
        .unwrap();
        assert_eq!(config.interface.as_deref(), Some("wlan0"));
        assert_eq!(config.interval, Some(30));
        assert_eq!(config.endpoint.as_deref(), Some("http://127.0.0.1:8080/loc/json"));
    }
}
