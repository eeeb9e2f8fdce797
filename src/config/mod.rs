#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::google::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::core::finder::{ExecutionMode, MatchPolicy, SearchOptions, DEFAULT_MAX_WORKERS};
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::SettingsFile;

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const DEFAULT_CATALOG_PATH: &str = "birthday_deals.csv";
pub const MAX_WORKERS_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct FinderSettings {
    pub location: String,
    pub radius: f64,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub catalog_path: PathBuf,
    pub search: SearchOptions,
    pub format: OutputFormat,
    pub compare: bool,
    pub monitor: bool,
}

impl FinderSettings {
    /// Merges flags, environment and settings file; flags win, then the
    /// environment, then the file, then built-in defaults.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig, env_api_key: Option<String>, file: &SettingsFile) -> Self {
        let api_key = cli
            .api_key
            .clone()
            .or(env_api_key)
            .or_else(|| file.api_key().map(str::to_string))
            .filter(|key| !key.trim().is_empty());

        let mode = if cli.sequential {
            ExecutionMode::Sequential
        } else if cli.concurrent {
            ExecutionMode::Concurrent
        } else {
            file.mode().unwrap_or_default()
        };

        let policy = if cli.nearest {
            MatchPolicy::Nearest
        } else {
            file.policy().unwrap_or_default()
        };

        Self {
            location: cli.location.clone(),
            radius: cli.radius,
            api_key,
            base_url: file.base_url().unwrap_or(DEFAULT_BASE_URL).to_string(),
            timeout: Duration::from_secs(file.timeout_seconds().unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            catalog_path: cli
                .catalog
                .clone()
                .or_else(|| file.catalog_path().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            search: SearchOptions {
                unit: cli.unit.or(file.unit()).unwrap_or_default(),
                mode,
                max_workers: cli
                    .max_workers
                    .or(file.max_workers())
                    .unwrap_or(DEFAULT_MAX_WORKERS),
                policy,
            },
            format: cli.format,
            compare: cli.compare,
            monitor: cli.monitor,
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        validation::validate_required_field("api_key", &self.api_key).map(String::as_str)
    }
}

impl Validate for FinderSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("location", &self.location)?;
        validation::validate_radius("radius", self.radius)?;
        validation::validate_url("provider.base_url", &self.base_url)?;
        validation::validate_range(
            "max_workers",
            self.search.max_workers,
            1,
            MAX_WORKERS_LIMIT,
        )?;

        let catalog = self.catalog_path.to_str().ok_or_else(|| {
            FinderError::InvalidConfigValueError {
                field: "catalog".to_string(),
                value: self.catalog_path.display().to_string(),
                reason: "Path is not valid UTF-8".to_string(),
            }
        })?;
        validation::validate_path("catalog", catalog)?;

        self.api_key()?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::model::DistanceUnit;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliConfig {
        let mut full = vec!["birthday-deals"];
        full.extend_from_slice(args);
        CliConfig::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = FinderSettings::resolve(
            &cli(&["New York, NY", "5"]),
            Some("env-key".to_string()),
            &SettingsFile::default(),
        );

        assert_eq!(settings.api_key().unwrap(), "env-key");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(settings.search.max_workers, 10);
        assert_eq!(settings.search.mode, ExecutionMode::Concurrent);
        assert_eq!(settings.search.policy, MatchPolicy::FirstInRadius);
        assert_eq!(settings.search.unit, DistanceUnit::Miles);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = SettingsFile::from_toml_str(
            "[provider]\napi_key = \"file-key\"\n[search]\nmax_workers = 3\nmode = \"sequential\"\n",
        )
        .unwrap();

        let settings = FinderSettings::resolve(
            &cli(&["Miami, FL", "15", "--api-key", "flag-key"]),
            Some("env-key".to_string()),
            &file,
        );
        assert_eq!(settings.api_key().unwrap(), "flag-key");
        assert_eq!(settings.search.max_workers, 3);
        assert_eq!(settings.search.mode, ExecutionMode::Sequential);

        let settings = FinderSettings::resolve(&cli(&["Miami, FL", "15"]), None, &file);
        assert_eq!(settings.api_key().unwrap(), "file-key");

        let settings =
            FinderSettings::resolve(&cli(&["Miami, FL", "15", "--concurrent"]), None, &file);
        assert_eq!(settings.search.mode, ExecutionMode::Concurrent);
    }

    #[test]
    fn test_missing_api_key() {
        let settings =
            FinderSettings::resolve(&cli(&["Chicago, IL", "3"]), None, &SettingsFile::default());
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, FinderError::MissingConfigError { ref field } if field == "api_key"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let settings = FinderSettings::resolve(
            &cli(&["Chicago, IL", "3"]),
            Some("   ".to_string()),
            &SettingsFile::default(),
        );
        assert!(settings.api_key().is_err());
    }

    #[test]
    fn test_invalid_radius_and_workers() {
        let settings = FinderSettings::resolve(
            &cli(&["Chicago, IL", "0"]),
            Some("k".to_string()),
            &SettingsFile::default(),
        );
        assert!(settings.validate().is_err());

        let settings = FinderSettings::resolve(
            &cli(&["Chicago, IL", "3", "--max-workers", "0"]),
            Some("k".to_string()),
            &SettingsFile::default(),
        );
        assert!(settings.validate().is_err());
    }
}
