//! `global_config.yaml` at the root of the data directory.
//!
//! ```yaml
//! active_user: "123456789"
//! data_format_version: "1.0"
//! ```
//!
//! `active_user` is who the CLI acts for when `--user` is not given. Files
//! written by a different data format version are refused rather than
//! guessed at.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::CsvConnection;

const GLOBAL_CONFIG_FILE: &str = "global_config.yaml";
pub const DATA_FORMAT_VERSION: &str = "1.0";

fn current_version() -> String {
    DATA_FORMAT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub active_user: Option<String>,
    #[serde(default = "current_version")]
    pub data_format_version: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            active_user: None,
            data_format_version: current_version(),
        }
    }
}

#[derive(Clone)]
pub struct GlobalConfigRepository {
    connection: CsvConnection,
}

impl GlobalConfigRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn path(&self) -> PathBuf {
        self.connection.base_directory().join(GLOBAL_CONFIG_FILE)
    }

    /// Read the config; a missing file means defaults
    pub fn load(&self) -> Result<GlobalConfig> {
        let path = self.path();
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: GlobalConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed {}", path.display()))?;
        if config.data_format_version != DATA_FORMAT_VERSION {
            bail!(
                "{} uses data format {}, this build reads {}",
                path.display(),
                config.data_format_version,
                DATA_FORMAT_VERSION
            );
        }

        debug!("Loaded global config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, config: &GlobalConfig) -> Result<()> {
        let yaml_content = serde_yaml::to_string(config)?;
        CsvConnection::write_atomic(&self.path(), yaml_content.as_bytes())
    }

    pub fn active_user(&self) -> Result<Option<String>> {
        Ok(self.load()?.active_user)
    }

    pub fn set_active_user(&self, user_key: Option<&str>) -> Result<()> {
        let mut config = self.load()?;
        config.active_user = user_key.map(str::to_string);
        self.save(&config)?;

        match user_key {
            Some(user) => info!("Active user is now '{}'", user),
            None => info!("Cleared active user"),
        }
        Ok(())
    }
}
