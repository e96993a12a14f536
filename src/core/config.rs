/*
 * Manages the launcher's persisted settings: where the engine executable lives,
 * which arguments it gets, and an optional override of the private data root.
 * Settings are stored as pretty-printed JSON in the local configuration
 * directory. A missing file yields the default (empty) configuration.
 *
 * `ConfigManagerOperations` abstracts the storage so the application logic and
 * the platform layer can be tested against an in-memory mock.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

const CONFIG_FILENAME: &str = "launcher.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub engine_path: Option<PathBuf>,
    #[serde(default)]
    pub engine_args: Vec<String>,
    // Replaces the per-user private data directory when set.
    #[serde(default)]
    pub destination_root: Option<PathBuf>,
}

impl LauncherConfig {
    /*
     * Applies command-line overrides on top of the stored values. Returns true
     * if anything changed, so the caller knows whether to save.
     */
    pub fn merge_overrides(
        &mut self,
        engine_path: Option<PathBuf>,
        engine_args: Vec<String>,
        destination_root: Option<PathBuf>,
    ) -> bool {
        let mut changed = false;
        if let Some(path) = engine_path {
            changed |= self.engine_path.as_ref() != Some(&path);
            self.engine_path = Some(path);
        }
        if !engine_args.is_empty() {
            changed |= self.engine_args != engine_args;
            self.engine_args = engine_args;
        }
        if let Some(root) = destination_root {
            changed |= self.destination_root.as_ref() != Some(&root);
            self.destination_root = Some(root);
        }
        changed
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self) -> Result<LauncherConfig>;
    fn save_config(&self, config: &LauncherConfig) -> Result<()>;
    // Directory holding the configuration, the log file, and the import record.
    fn config_dir(&self) -> Option<PathBuf>;
}

pub struct CoreConfigManager {
    config_dir: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn for_app(app_name: &str) -> Self {
        CoreConfigManager {
            config_dir: path_utils::get_base_app_config_local_dir(app_name),
        }
    }

    #[cfg(test)]
    pub fn with_config_dir(config_dir: &std::path::Path) -> Self {
        CoreConfigManager {
            config_dir: Some(config_dir.to_path_buf()),
        }
    }

    fn config_file_path(&self) -> Result<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .ok_or(ConfigError::NoProjectDirectory)
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_config(&self) -> Result<LauncherConfig> {
        let file_path = self.config_file_path()?;
        if !file_path.exists() {
            log::debug!("CoreConfigManager: {file_path:?} does not exist, using defaults.");
            return Ok(LauncherConfig::default());
        }
        let reader = BufReader::new(File::open(&file_path)?);
        let config: LauncherConfig = serde_json::from_reader(reader)?;
        log::debug!("CoreConfigManager: Loaded {config:?} from {file_path:?}.");
        Ok(config)
    }

    fn save_config(&self, config: &LauncherConfig) -> Result<()> {
        let file_path = self.config_file_path()?;
        let mut writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut writer, config)?;
        writer.flush()?;
        log::debug!("CoreConfigManager: Saved configuration to {file_path:?}.");
        Ok(())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir.clone()
    }
}
