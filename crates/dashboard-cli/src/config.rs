// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Dashboard configuration
//!
//! Settings are layered with the `config` crate. Later sources override
//! earlier ones:
//!
//! 1. Default values
//! 2. `dashboard.json`
//! 3. `dashboard.{environment}.json`
//! 4. A file passed with `--config`
//! 5. Environment variables with the `DASHBOARD_` prefix, using `__` for
//!    nesting (`DASHBOARD_BACKEND__BASE_URL`)

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{Result, ensure};
use backend_client::{BackendConfig, DEFAULT_BASE_URL};
use config::{Config, Environment as ConfigEnv, File, Map};
use serde::{Deserialize, Deserializer, Serialize, de};
use url::Url;

use crate::error::ConfigError;

/// Prefix of the environment variables read by the dashboard
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Variable selecting the environment-specific configuration file
pub const ENVIRONMENT_VAR: &str = "DASHBOARD_ENVIRONMENT";

/// Base name of the configuration files
const CONFIG_FILE_STEM: &str = "dashboard";

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Default request timeout (30 seconds)
    pub const fn request_default() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Default health check timeout (5 seconds)
    pub const fn health_check_default() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }

    /// Get the timeout in whole seconds
    pub fn seconds(&self) -> u64 {
        self.0.as_secs()
    }
}

impl Serialize for TimeoutSeconds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.seconds())
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Environment types for configuration
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    #[default]
    Development,
    /// Testing environment
    Testing,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "development" => Ok(Environment::Development),
            "testing" => Ok(Environment::Testing),
            other => Err(ConfigError::invalid(format!(
                "unknown environment '{other}', expected production, development or testing"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(|e: ConfigError| de::Error::custom(e.to_string()))
    }
}

/// Connection settings for the analysis backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the backend
    pub base_url: Url,
    /// Timeout for analysis, detection, stats and catalogue requests
    pub timeout_seconds: TimeoutSeconds,
    /// Timeout for the health check
    pub health_check_timeout_seconds: TimeoutSeconds,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let defaults = BackendConfig::default();
        Self {
            base_url: defaults.base_url,
            timeout_seconds: TimeoutSeconds::request_default(),
            health_check_timeout_seconds: TimeoutSeconds::health_check_default(),
            user_agent: defaults.user_agent,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Environment type
    pub environment: Environment,
    /// Backend connection settings
    pub backend: BackendSettings,
}

/// Where configuration is read from
///
/// The default reads `dashboard*.json` from the working directory and the
/// process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Directory searched for `dashboard.json` and its environment variant
    pub directory: Option<PathBuf>,
    /// Explicit configuration file; it must exist when given
    pub file: Option<PathBuf>,
    /// Variables to use instead of the process environment
    pub vars: Option<Map<String, String>>,
}

impl ConfigSources {
    /// Read from the working directory, the process environment and `file`
    pub fn with_file(file: Option<&Path>) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            ..Self::default()
        }
    }

    fn environment(&self) -> Result<Environment, ConfigError> {
        let name = match &self.vars {
            Some(vars) => vars.get(ENVIRONMENT_VAR).cloned(),
            None => std::env::var(ENVIRONMENT_VAR).ok(),
        };
        match name {
            Some(name) => name.parse(),
            None => Ok(Environment::default()),
        }
    }

    fn file_in_directory(&self, name: &str) -> PathBuf {
        match &self.directory {
            Some(directory) => directory.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the working directory, the process environment
    /// and an optional explicit file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSources::with_file(file))
    }

    /// Load configuration from explicit sources
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value is invalid.
    pub fn load_from(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let defaults = BackendSettings::default();
        let environment = sources.environment()?;

        let mut builder = Config::builder()
            .set_default("environment", Environment::default().to_string())?
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default(
                "backend.timeout_seconds",
                defaults.timeout_seconds.seconds(),
            )?
            .set_default(
                "backend.health_check_timeout_seconds",
                defaults.health_check_timeout_seconds.seconds(),
            )?
            .set_default("backend.user_agent", defaults.user_agent)?
            .add_source(
                File::from(sources.file_in_directory(&format!("{CONFIG_FILE_STEM}.json")))
                    .required(false),
            )
            .add_source(
                File::from(
                    sources.file_in_directory(&format!("{CONFIG_FILE_STEM}.{environment}.json")),
                )
                .required(false),
            );

        if let Some(file) = &sources.file {
            builder = builder.add_source(File::from(file.as_path()).required(true));
        }

        let config = builder
            .add_source(
                ConfigEnv::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(sources.vars.clone()),
            )
            .build()?;

        let dashboard: Self = config.try_deserialize()?;
        dashboard.validate()?;
        Ok(dashboard)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let scheme = self.backend.base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::invalid(format!(
                "backend.base_url must use http or https, got '{scheme}'"
            )));
        }
        if self.backend.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("backend.user_agent cannot be empty"));
        }
        Ok(())
    }

    /// Settings for the HTTP analysis service
    pub fn to_backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend.base_url.clone(),
            timeout_seconds: self.backend.timeout_seconds.seconds(),
            health_check_timeout_seconds: self.backend.health_check_timeout_seconds.seconds(),
            user_agent: self.backend.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> ConfigSources {
        ConfigSources {
            directory: Some(PathBuf::from("/nonexistent/review-dashboard")),
            file: None,
            vars: Some(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
        }
    }

    #[test]
    fn timeout_validation() {
        assert!(TimeoutSeconds::new(0).is_err());
        assert!(TimeoutSeconds::new(301).is_err());

        assert!(TimeoutSeconds::new(1).is_ok());
        assert_eq!(TimeoutSeconds::new(300).unwrap().seconds(), 300);
    }

    #[test]
    fn defaults_without_any_source() {
        let config = DashboardConfig::load_from(&vars(&[])).unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.backend.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.backend.timeout_seconds.seconds(), 30);
        assert_eq!(config.backend.health_check_timeout_seconds.seconds(), 5);
    }

    #[test]
    fn environment_variables_override_defaults() {
        let config = DashboardConfig::load_from(&vars(&[
            ("DASHBOARD_ENVIRONMENT", "production"),
            ("DASHBOARD_BACKEND__BASE_URL", "https://reviews.example.com/api/"),
            ("DASHBOARD_BACKEND__TIMEOUT_SECONDS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.backend.base_url.as_str(),
            "https://reviews.example.com/api/"
        );
        assert_eq!(config.backend.timeout_seconds.seconds(), 60);
    }

    #[test]
    fn out_of_range_timeout_is_rejected() {
        let result = DashboardConfig::load_from(&vars(&[(
            "DASHBOARD_BACKEND__TIMEOUT_SECONDS",
            "0",
        )]));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let result = DashboardConfig::load_from(&vars(&[(
            "DASHBOARD_BACKEND__BASE_URL",
            "ftp://reviews.example.com",
        )]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn backend_config_carries_settings() {
        let mut config = DashboardConfig::default();
        config.backend.timeout_seconds = TimeoutSeconds::new(12).unwrap();

        let backend = config.to_backend_config();
        assert_eq!(backend.timeout_seconds, 12);
        assert_eq!(backend.health_check_timeout_seconds, 5);
        assert_eq!(backend.base_url, config.backend.base_url);
    }

    #[test]
    fn environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Testing.to_string(), "testing");
    }

    #[test]
    fn environment_parses_any_case() {
        assert_eq!(" TESTING ".parse::<Environment>().unwrap(), Environment::Testing);
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
