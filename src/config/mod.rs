//! Configuration module for vitrine
//!
//! Settings live in `<config_dir>/vitrine/config.toml`. Every key can be
//! overridden from the environment with the `VITRINE_` prefix and `__` as the
//! nesting separator (`VITRINE_LOGGING__JSON=true`,
//! `VITRINE_PAGES__NEWS__PAGE_SIZE=12`). A missing file means defaults.

use crate::counter::CountProtocol;
use crate::profile::{PageProfile, PageSettings};
use crate::query::SortKey;
use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Per-page overrides; unset fields fall back to the profile defaults
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortKey>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ViewCountConfig {
    /// Use the source's single-call increment when it has one
    #[serde(default)]
    pub atomic: bool,
}

impl ViewCountConfig {
    #[must_use]
    pub const fn protocol(&self) -> CountProtocol {
        if self.atomic {
            CountProtocol::Atomic
        } else {
            CountProtocol::TwoStep
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable logs
    #[serde(default)]
    pub json: bool,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct VitrineConfig {
    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Page name ("news", "contests", "services", "archive") -> overrides
    #[serde(default)]
    pub pages: BTreeMap<String, PageConfig>,

    #[serde(default)]
    pub view_counts: ViewCountConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VitrineConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("vitrine").join("config.toml"))
    }

    /// Load from the default location with environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?, None)
    }

    /// Load from `path`; `env` replaces the process environment when given
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed, or if
    /// a page override is invalid.
    pub fn load_from(path: &Path, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("VITRINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Same as [`VitrineConfig::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))
    }

    /// Effective settings for one page
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero page size or a default sort the page
    /// does not offer.
    pub fn page_settings(&self, profile: PageProfile) -> Result<PageSettings, ConfigError> {
        let mut settings = PageSettings::from(profile);
        let Some(page) = self.pages.get(profile.as_str()) else {
            return Ok(settings);
        };

        if let Some(size) = page.page_size {
            settings.page_size = NonZeroUsize::new(size).ok_or_else(|| {
                ConfigError::Message(format!("Invalid page size 0 for the {profile} page"))
            })?;
        }
        if let Some(sort) = page.default_sort {
            settings.default_sort = profile
                .check_sort_key(sort)
                .map_err(|e| ConfigError::Message(e.to_string()))?;
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for name in self.pages.keys() {
            let profile: PageProfile = name.parse().map_err(ConfigError::Message)?;
            self.page_settings(profile)?;
        }
        Ok(())
    }
}
