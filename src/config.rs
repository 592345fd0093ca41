//! Configuration file reader
//!
//! Reads `config.toml` from the directory given on the command line:
//!
//! ```toml
//! [libs]
//! delete = ["play-authorisation"]
//!
//! [registries]
//! primary = "https://registry.example/{name}/latest"
//! secondary = "https://repo.example/releases/{name}_2.11/"
//! timeout_secs = 5
//!
//! [extract]
//! organization = "uk.gov.hmrc"
//! ```
//!
//! Every key is optional.

use crate::error::ConfigError;
use crate::extract::DEFAULT_ORGANIZATION;
use crate::registry::{DEFAULT_PRIMARY_URL, DEFAULT_SECONDARY_URL, DEFAULT_TIMEOUT, NAME_PLACEHOLDER};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up in the config directory
pub const CONFIG_FILENAME: &str = "config.toml";

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Library lists
    pub libs: LibsConfig,
    /// Registry endpoints
    pub registries: RegistriesConfig,
    /// Declaration extraction
    pub extract: ExtractConfig,
}

/// `[libs]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibsConfig {
    /// Libraries to be removed for the migration
    pub delete: Vec<String>,
}

/// `[registries]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistriesConfig {
    /// Primary URL template
    pub primary: String,
    /// Secondary URL template
    pub secondary: String,
    /// Per-request deadline in seconds
    pub timeout_secs: u64,
}

impl Default for RegistriesConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_URL.to_string(),
            secondary: DEFAULT_SECONDARY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl RegistriesConfig {
    /// Per-request deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[extract]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Organization whose libraries are checked
    pub organization: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }
}

/// A loaded configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Parsed settings
    pub config: Config,
    /// Path of the file used, `None` when defaults were applied
    pub path: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from a directory
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn load(dir: &Path, required: bool) -> Result<LoadedConfig, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(LoadedConfig::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&content, &path)?;
        Ok(LoadedConfig {
            config,
            path: Some(path),
        })
    }

    /// Libraries flagged for removal
    pub fn removal_set(&self) -> HashSet<String> {
        self.libs.delete.iter().cloned().collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (registry, template) in [
            ("primary", &self.registries.primary),
            ("secondary", &self.registries.secondary),
        ] {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(ConfigError::InvalidTemplate {
                    registry: registry.to_string(),
                    template: template.clone(),
                });
            }
        }

        if self.registries.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "registries.timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.extract.organization.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "extract.organization must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
