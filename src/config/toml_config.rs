use crate::core::finder::{ExecutionMode, MatchPolicy};
use crate::domain::model::DistanceUnit;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every field may be omitted; CLI flags and the
/// environment take precedence over anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub provider: Option<ProviderSection>,
    pub search: Option<SearchSection>,
    pub catalog: Option<CatalogSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub max_workers: Option<usize>,
    pub unit: Option<DistanceUnit>,
    pub policy: Option<MatchPolicy>,
    pub mode: Option<ExecutionMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    pub path: Option<String>,
}

impl SettingsFile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.provider.as_ref()?.base_url.as_deref()
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.provider.as_ref()?.timeout_seconds
    }

    /// The configured key, ignoring placeholders whose variable was unset.
    pub fn api_key(&self) -> Option<&str> {
        self.provider
            .as_ref()?
            .api_key
            .as_deref()
            .filter(|key| !key.starts_with("${"))
    }

    pub fn max_workers(&self) -> Option<usize> {
        self.search.as_ref()?.max_workers
    }

    pub fn unit(&self) -> Option<DistanceUnit> {
        self.search.as_ref()?.unit
    }

    pub fn policy(&self) -> Option<MatchPolicy> {
        self.search.as_ref()?.policy
    }

    pub fn mode(&self) -> Option<ExecutionMode> {
        self.search.as_ref()?.mode
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog.as_ref()?.path.as_deref()
    }
}

impl Validate for SettingsFile {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.base_url() {
            validation::validate_url("provider.base_url", url)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            validation::validate_range("provider.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(workers) = self.max_workers() {
            validation::validate_positive_number("search.max_workers", workers, 1)?;
        }
        if let Some(path) = self.catalog_path() {
            validation::validate_path("catalog.path", path)?;
        }
        Ok(())
    }
}
