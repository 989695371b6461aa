//! Shared, reloadable configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// Config snapshot shared between the CLI and the session.
///
/// Readers clone the current value out; `reload` swaps it wholesale or
/// leaves it untouched on error.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Load `path` (or the platform default) and wrap it.
    pub fn open(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(Config::config_path);
        let config = Config::load_from(&path)?;
        tracing::debug!(path = %path.display(), "Config loaded");
        Ok(Self::new(config, path))
    }

    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    /// Re-read the file. The previous config stays in place on failure.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = Config::load_from(&self.path)?;
        *self.inner.write() = config;
        tracing::info!(path = %self.path.display(), "Config reloaded");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
