//! Configuration management for votechain

use crate::error::VoteError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// File read by [`load_config`] when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "votechain.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub election: ElectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ElectionConfig {
    #[serde(default = "default_election_name")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Hex characters of each hash shown in the chain table; 0 shows all.
    #[serde(default = "default_hash_preview")]
    pub hash_preview: usize,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            name: default_election_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hash_preview: default_hash_preview(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, VoteError> {
        tracing::Level::from_str(self.level.trim()).map_err(|_| {
            VoteError::ConfigError(format!(
                "logging.level must be one of trace, debug, info, warn, error (got '{}')",
                self.level
            ))
        })
    }
}

fn default_election_name() -> String {
    "General Election".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_hash_preview() -> usize {
    16
}

/// Load `votechain.toml` from the working directory, falling back to defaults
/// when it is absent.
pub fn load_config() -> Result<Config, VoteError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, VoteError> {
    let path = path.as_ref();
    let config_str = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, VoteError> {
    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(config_str)?
    };

    // Validate critical values
    if config.election.name.trim().is_empty() {
        return Err(VoteError::ConfigError(
            "election.name must not be empty".to_string(),
        ));
    }
    config.logging.max_level()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config.election.name, "General Election");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.display.hash_preview, 16);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_config("[election]\nname = \"Board Vote\"\n").unwrap();
        assert_eq!(config.election.name, "Board Vote");
        assert_eq!(config.logging.max_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [election]
            name = "Club"

            [logging]
            level = "debug"

            [display]
            hash_preview = 0
        "#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.logging.max_level().unwrap(), tracing::Level::DEBUG);
        assert_eq!(config.display.hash_preview, 0);
    }

    #[test]
    fn test_rejects_bad_level() {
        let err = parse_config("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = parse_config("[election]\nname = \"  \"\n").unwrap_err();
        assert!(matches!(err, VoteError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            parse_config("[election\nname ="),
            Err(VoteError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.election.name, "General Election");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("votechain.toml");
        fs::write(&path, "[display]\nhash_preview = 8\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.display.hash_preview, 8);
    }
}
