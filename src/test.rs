//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::Owner;
use crate::store::mem::{MemState, MemStore};
use crate::store::Mode;
use crate::{Config, Ledger};
use tempfile::TempDir;

/// Test environment that sets up a ledger home directory with a Config and an
/// in-memory store keyed by that directory. Holds the TempDir to keep the
/// directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
    owner: Owner,
}

impl TestEnv {
    /// Creates a test environment. The in-memory state for this environment's
    /// key starts out seeded with sample data owned by the default identity;
    /// the test owner's partition is empty.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("rider-ledger");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
            owner: Owner::new("kim", "1234"),
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The caller identity used by this environment.
    pub fn owner(&self) -> Owner {
        self.owner.clone()
    }

    /// The registry key of the in-memory store for this environment.
    pub fn mem_key(&self) -> String {
        self.config.root().display().to_string()
    }

    /// An in-memory ledger opened as this environment's owner.
    pub fn ledger(&self) -> Ledger {
        Ledger::open(&self.config, self.owner(), Mode::Memory)
    }

    /// Resets the in-memory state to empty tables and no goal.
    pub fn clear_state(&self) {
        MemStore::set_state(&self.mem_key(), MemState::default());
    }
}
