//! Client configuration at ~/.config/ews/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EwsError, EwsResult};
use crate::timezone::TimeZoneDefinition;
use crate::version::ExchangeVersion;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Version sent in `RequestServerVersion`; gates version-dependent fields.
    #[serde(default)]
    pub requested_server_version: ExchangeVersion,

    /// File holding a `TimeZoneDefinition` document for the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_file: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn config_path() -> EwsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EwsError::Config("Could not determine config directory".into()))?
            .join("ews");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> EwsResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> EwsResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EwsError::Config(e.to_string()))
    }

    pub fn save(&self) -> EwsResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> EwsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EwsError::Config(format!("Could not create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| EwsError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| EwsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Reads and parses `time_zone_file`, expanding a leading `~`.
    pub fn load_time_zone(&self) -> EwsResult<Option<TimeZoneDefinition>> {
        let Some(path) = &self.time_zone_file else {
            return Ok(None);
        };
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        let document = std::fs::read_to_string(&expanded).map_err(|e| {
            EwsError::Config(format!("Could not read time zone file {}: {e}", expanded.display()))
        })?;
        TimeZoneDefinition::from_xml(&document).map(Some)
    }
}
