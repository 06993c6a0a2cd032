//! Settings persistence.
//!
//! [`SettingsStore`] is the port the mode persists through on every
//! mutation. [`FileStore`] keeps TOML on disk, [`MemoryStore`] keeps it in
//! process.

mod config;

pub use config::{Config, GuardConfig, MeterConfig};

use std::cell::{Cell, RefCell};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::ConfigError;

/// Returns `~/.config/braindump[-dev]/` based on BRAINDUMP_ENV.
///
/// Set BRAINDUMP_ENV=dev to use the development settings directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BRAINDUMP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("braindump-dev")
    } else {
        base_dir.join("braindump")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

pub trait SettingsStore {
    /// Load settings merged over defaults. Never fails.
    fn load(&self) -> Config;

    /// Persist settings.
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `config.toml` inside [`data_dir`].
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(data_dir()?.join("config.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    /// A missing file yields defaults and writes them; an unreadable one
    /// yields defaults.
    fn load(&self) -> Config {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Config::from_toml_lenient(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Config::default();
                if let Err(e) = self.save(&cfg) {
                    tracing::warn!(error = %e, "could not write default settings");
                }
                cfg
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read settings; using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let content = config.to_toml().map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }
}

/// In-process store. Clones share the saved value and the save counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<Config>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn with_config(config: Config) -> Self {
        Self {
            saved: Rc::new(RefCell::new(Some(config))),
            saves: Rc::default(),
        }
    }

    pub fn saved(&self) -> Option<Config> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Config {
        self.saved().unwrap_or_default()
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        *self.saved.borrow_mut() = Some(config.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("config.toml"));
        assert_eq!(store.load(), Config::default());
        assert!(store.path().exists());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("config.toml"));
        let mut cfg = Config::default();
        cfg.meter.enabled = true;
        cfg.meter.goal_tpm = 900.0;
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn malformed_file_loads_defaults_without_overwriting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.load(), Config::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not = [valid");
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryStore::default();
        let shared = store.clone();
        assert_eq!(store.load(), Config::default());
        store.save(&Config::default()).unwrap();
        assert_eq!(shared.save_count(), 1);
        assert!(shared.saved().is_some());
    }
}
