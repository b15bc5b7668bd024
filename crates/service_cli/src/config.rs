//! CLI configuration management
//!
//! Settings come from `fxhedge.toml` when present, then `FXHEDGE_*`
//! environment variables override individual fields.

use std::path::Path;
use std::str::FromStr;

use hedge_pricing::mc::MAX_PATHS;
use hedge_risk::SimulationConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        s.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_filter_str().to_string()
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Resolved CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level when `--verbose` is not given
    pub log_level: LogLevel,
    /// Default simulation settings; a scenario file may replace them
    pub simulation: SimulationConfig,
}

impl CliConfig {
    /// Loads `path` if it exists, otherwise defaults, then applies the
    /// process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Applies `FXHEDGE_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FXHEDGE_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        if let Some(seed) = lookup("FXHEDGE_SEED") {
            self.simulation.seed = parse_env("FXHEDGE_SEED", &seed)?;
        }
        if let Some(paths) = lookup("FXHEDGE_PRICING_PATHS") {
            self.simulation.pricing_paths = parse_env("FXHEDGE_PRICING_PATHS", &paths)?;
        }
        if let Some(paths) = lookup("FXHEDGE_REAL_PATHS") {
            self.simulation.real_paths = parse_env("FXHEDGE_REAL_PATHS", &paths)?;
        }
        Ok(())
    }

    /// Collects every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let sim = &self.simulation;
        if sim.real_paths == 0 || sim.real_paths > MAX_PATHS {
            errors.push(format!(
                "real_paths must be in [1, {MAX_PATHS}], got {}",
                sim.real_paths
            ));
        }
        if sim.pricing_paths == 0 || sim.pricing_paths > MAX_PATHS {
            errors.push(format!(
                "pricing_paths must be in [1, {MAX_PATHS}], got {}",
                sim.pricing_paths
            ));
        }
        if let Some(v) = sim.real_volatility {
            if !(v.is_finite() && v > 0.0) {
                errors.push(format!("real_volatility must be a positive percentage, got {v}"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_from_toml() {
        let config = CliConfig::from_toml(
            r#"
            log_level = "debug"

            [simulation]
            pricing_paths = 20000
            method = "monte_carlo"
            realized_source = "simulated"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.simulation.pricing_paths, 20_000);
        assert_eq!(config.simulation.real_paths, SimulationConfig::default().real_paths);
        assert!(CliConfig::from_toml("log_level = \"loud\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FXHEDGE_SEED", "7"),
            ("FXHEDGE_REAL_PATHS", " 500 "),
            ("FXHEDGE_LOG_LEVEL", "WARN"),
        ]);
        let mut config = CliConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.real_paths, 500);
        assert_eq!(config.log_level, LogLevel::Warn);

        let err = config
            .apply_env(|k| (k == "FXHEDGE_PRICING_PATHS").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "FXHEDGE_PRICING_PATHS", .. }));
    }

    #[test]
    fn test_validation_lists_every_error() {
        let mut config = CliConfig::default();
        config.simulation.real_paths = 0;
        config.simulation.pricing_paths = MAX_PATHS + 1;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation errors, got {other:?}"),
        }
    }
}
