use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, fs::config_dir};

const FILE_NAME: &str = "roster.toml";
const DEFAULT_TABLE: &str = "Students";

const URL_VAR: &str = "ROSTER_URL";
const API_KEY_VAR: &str = "ROSTER_API_KEY";
const TABLE_VAR: &str = "ROSTER_TABLE";

/// Connection settings for the hosted student table, serialized to TOML.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: DEFAULT_TABLE.into(),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl StoreConfig {
    /// Path of the configuration file inside the user's config directory.
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    /// Load the configuration from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the configuration at `path`, writing a blank template there if it doesn't exist
    /// yet. Environment overrides are applied on top.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            debug!("Wrote configuration template to {}", path.display());
            cfg
        };

        cfg.apply_overrides(|name| env::var(name).ok());

        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    /// Override settings with any values returned by `lookup` for the `ROSTER_*` variables.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = lookup(URL_VAR) {
            self.url = url;
        }
        if let Some(api_key) = lookup(API_KEY_VAR) {
            self.api_key = api_key;
        }
        if let Some(table) = lookup(TABLE_VAR) {
            self.table = table;
        }
    }
}
