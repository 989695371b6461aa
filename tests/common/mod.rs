//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod fake_catalog;
pub mod mock_tmdb;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cinefeed::config::Config;
use cinefeed::session::Session;
use cinefeed::storage::KeyValueStore;
use tempfile::TempDir;

pub use fake_catalog::{movies, popular_page, search_page, Call, FakeCatalog, PendingCall};

/// Write `content` to a `config.toml` inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Default config with storage rooted at `data_dir`.
pub fn config_in(data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = Some(data_dir.to_path_buf());
    config
}

/// Session over a fake catalog and an explicit store.
pub fn make_session(
    config: Config,
    catalog: Arc<FakeCatalog>,
    store: Arc<dyn KeyValueStore>,
) -> Session {
    Session::with_parts(config, catalog, store)
}
