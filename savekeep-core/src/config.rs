use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Result, SavekeepError};

/// File name of the configuration inside the config directory
pub const CONFIG_FILE: &str = "config.json";

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File being backed up
    #[serde(default)]
    pub save_path: PathBuf,
    /// Directory holding backup files and the catalog
    #[serde(default)]
    pub backup_dir: PathBuf,
    /// Take an unnamed backup before every restore
    #[serde(default = "default_auto_backup")]
    pub auto_backup: bool,
}

fn default_auto_backup() -> bool {
    true
}

impl Config {
    pub fn new(save_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            backup_dir: backup_dir.into(),
            auto_backup: default_auto_backup(),
        }
    }

    /// Load configuration from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist yet (first run).
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let config = serde_json::from_slice(&data).map_err(|e| {
            SavekeepError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(config))
    }

    /// Write configuration to `path`, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(self).map_err(|e| {
            SavekeepError::Configuration(format!("Failed to serialize configuration: {}", e))
        })?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Configured save file, or an error if none is set
    pub fn require_save_path(&self) -> Result<&Path> {
        if self.save_path.as_os_str().is_empty() {
            return Err(SavekeepError::Configuration(
                "save file path is not configured".to_string(),
            ));
        }
        Ok(&self.save_path)
    }

    /// Configured backup directory, or an error if none is set
    pub fn require_backup_dir(&self) -> Result<&Path> {
        if self.backup_dir.as_os_str().is_empty() {
            return Err(SavekeepError::Configuration(
                "backup directory is not configured".to_string(),
            ));
        }
        Ok(&self.backup_dir)
    }
}

/// Default configuration file location (`<config dir>/savekeep/config.json`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("savekeep").join(CONFIG_FILE))
}
