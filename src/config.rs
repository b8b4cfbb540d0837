//! Configuration loading and management
//!
//! Handles parsing of `hearth.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::category::normalize_label;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Household display name
    #[serde(default = "default_household")]
    pub household: String,

    /// Identity configuration
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Tasks configuration
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Categories configuration
    #[serde(default)]
    pub categories: CategoriesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            household: default_household(),
            identity: IdentityConfig::default(),
            tasks: TasksConfig::default(),
            categories: CategoriesConfig::default(),
        }
    }
}

fn default_household() -> String {
    "home".to_string()
}

/// Identity-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Display name to sign in as when none is given
    #[serde(default)]
    pub default_user: Option<String>,
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Category applied to new tasks when none is given
    #[serde(default = "default_task_category")]
    pub default_category: String,

    /// Create new tasks as private unless told otherwise
    #[serde(default)]
    pub private_by_default: bool,
}

fn default_task_category() -> String {
    "General".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_category: default_task_category(),
            private_by_default: false,
        }
    }
}

/// Categories configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    /// Labels seeded into a fresh hub
    #[serde(default = "default_category_seed")]
    pub seed: Vec<String>,
}

fn default_category_seed() -> Vec<String> {
    crate::category::DEFAULT_CATEGORIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            seed: default_category_seed(),
        }
    }
}

impl Config {
    /// Load configuration from a `hearth.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a hub root, or return defaults
    pub fn load_from_hub(hub_root: &Path) -> Self {
        let config_path = hub_root.join("hearth.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.household.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "household cannot be empty".to_string(),
            ));
        }

        normalize_label(&self.tasks.default_category).map_err(|_| {
            crate::error::Error::InvalidConfig(
                "tasks.default_category cannot be empty".to_string(),
            )
        })?;

        if self.categories.seed.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "categories.seed cannot be empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for label in &self.categories.seed {
            let normalized = normalize_label(label).map_err(|_| {
                crate::error::Error::InvalidConfig(
                    "categories.seed cannot include empty entries".to_string(),
                )
            })?;
            if !seen.insert(normalized.to_lowercase()) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "categories.seed has duplicate entry '{normalized}'"
                )));
            }
        }

        Ok(())
    }
}
