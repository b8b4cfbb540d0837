//! Hub discovery and initialization.
//!
//! A hub is a directory containing a `.hearth/` data directory and an
//! optional `hearth.toml` next to it. Commands locate the hub from the
//! `--hub` flag, the `HEARTH_HUB` environment variable, or by walking up
//! from the working directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{DocumentStore, JsonStore};

pub const DATA_DIR_NAME: &str = ".hearth";
pub const CONFIG_FILE_NAME: &str = "hearth.toml";
pub const HUB_ENV_VAR: &str = "HEARTH_HUB";

/// A located hub: its root directory plus loaded configuration.
pub struct Hub {
    pub root: PathBuf,
    pub config: Config,
}

impl Hub {
    /// Locate the hub. Resolution order: explicit flag, `HEARTH_HUB`, the
    /// nearest ancestor of the working directory holding `.hearth/`, then
    /// the per-user default hub if one was initialized there.
    pub fn discover(flag: Option<&Path>) -> Result<Self> {
        if let Some(root) = flag {
            return Self::open(root);
        }
        if let Ok(value) = std::env::var(HUB_ENV_VAR) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Self::open(Path::new(trimmed));
            }
        }

        let cwd = std::env::current_dir()?;
        let mut current = Some(cwd.as_path());
        while let Some(dir) = current {
            if dir.join(DATA_DIR_NAME).is_dir() {
                return Self::open(dir);
            }
            current = dir.parent();
        }

        if let Some(root) = default_hub_root() {
            if root.join(DATA_DIR_NAME).is_dir() {
                return Self::open(&root);
            }
        }
        Err(Error::HubNotFound(cwd))
    }

    /// Open an explicit hub root, failing if it was never initialized.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.join(DATA_DIR_NAME).is_dir() {
            return Err(Error::HubNotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            config: Config::load_from_hub(root),
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(self.data_dir())
    }
}

/// Initialize a hub at `root`. Creates `.hearth/`, writes a default
/// `hearth.toml` if absent, and seeds the category set from the config.
/// Safe to re-run; existing files are left alone.
pub fn init(root: &Path, household: Option<&str>) -> Result<Hub> {
    let data_dir = root.join(DATA_DIR_NAME);
    std::fs::create_dir_all(&data_dir)?;

    let config_path = root.join(CONFIG_FILE_NAME);
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        let mut config = Config::default();
        if let Some(name) = household {
            config.household = name.trim().to_string();
        }
        config.save(&config_path)?;
        config
    };

    let hub = Hub {
        root: root.to_path_buf(),
        config,
    };
    seed_categories(&hub)?;
    tracing::info!(root = %root.display(), "initialized hub");
    Ok(hub)
}

/// Root of the per-user default hub, for members running hearth outside any
/// household directory.
pub fn default_hub_root() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hearth").map(|dirs| dirs.data_dir().to_path_buf())
}

fn seed_categories(hub: &Hub) -> Result<()> {
    use crate::category::{CategoryList, CATEGORIES_DOC_ID, CONFIG_COLLECTION};
    use crate::store::to_document;

    let store = hub.store();
    if store.get_one(CONFIG_COLLECTION, CATEGORIES_DOC_ID)?.is_some() {
        return Ok(());
    }

    let mut names = Vec::new();
    for label in &hub.config.categories.seed {
        let normalized = crate::category::normalize_label(label)?;
        if !names.contains(&normalized) {
            names.push(normalized);
        }
    }
    store.insert_with_id(
        CONFIG_COLLECTION,
        CATEGORIES_DOC_ID,
        to_document(&CategoryList { names })?,
    )
}
