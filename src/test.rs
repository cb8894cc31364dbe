//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::Config;
use tempfile::TempDir;

/// Test environment that sets up an angadia home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment pointing at an API that is never contacted; commands under test
    /// are given `Mode::Testing`.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("angadia");
        let config = Config::create(&root, "http://localhost:9/api/")
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }
}
