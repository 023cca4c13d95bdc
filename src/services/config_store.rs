// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SanitizeOptions;
use crate::services::pattern_locator::{BoilerplateCatalog, CatalogError};

pub const CONFIG_ENV: &str = "TEXTSWEEP_CONFIG";
const BACKUPS_TO_KEEP: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub sanitize: SanitizeOptions,
    #[serde(default)]
    pub phrases: PhraseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            sanitize: SanitizeOptions::default(),
            phrases: PhraseConfig::default(),
        }
    }
}

/// User additions to (or a replacement for) the built-in boilerplate table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhraseConfig {
    #[serde(default)]
    pub replace_builtin: bool,
    #[serde(default)]
    pub extra: Vec<PhraseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseEntry {
    pub pattern: String,
    pub label: String,
}

impl PhraseConfig {
    pub fn build_catalog(&self) -> Result<BoilerplateCatalog, CatalogError> {
        let mut catalog = if self.replace_builtin {
            BoilerplateCatalog::empty()
        } else {
            BoilerplateCatalog::builtin().clone()
        };
        catalog.extend(self.extra.iter().map(|e| (e.pattern.as_str(), e.label.as_str())))?;
        Ok(catalog)
    }
}

fn default_version() -> String { "1".to_string() }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Store rooted at an explicit file; backups go next to it.
    pub fn for_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("textsweep"))
    }

    /// `TEXTSWEEP_CONFIG` if set, otherwise the per-user config directory.
    pub fn discover() -> Option<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(p) if !p.trim().is_empty() => Some(Self::for_file(PathBuf::from(p))),
            _ => Self::default_config_dir().map(Self::new),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            debug!(path = %self.config_file.display(), "config.defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(|e| self.io_err(&self.config_file, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(|e| self.io_err(&self.config_dir, e))?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(|e| self.io_err(&self.config_file, e))
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(|e| self.io_err(&backup_dir, e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));
        fs::copy(&self.config_file, &backup_file).map_err(|e| self.io_err(&backup_file, e))?;

        self.cleanup_old_backups(&backup_dir, BACKUPS_TO_KEEP);
        Ok(())
    }

    /// Best effort; a failed prune never fails the save.
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) {
        let mut entries: Vec<_> = match fs::read_dir(backup_dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
                .collect(),
            Err(e) => {
                warn!(error = %e, "config.backup_prune_failed");
                return;
            }
        };

        if entries.len() <= keep {
            return;
        }

        // names embed the timestamp, so lexical order is age order
        entries.sort_by_key(|e| e.file_name());
        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            let _ = fs::remove_file(entry.path());
        }
    }

    fn io_err(&self, path: &Path, source: io::Error) -> ConfigError {
        ConfigError::Io { path: path.to_path_buf(), source }
    }
}
