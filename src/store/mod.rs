//! Table storage backends.
//!
//! A [`TableStore`] reads and writes raw rows for the three ledger tables and
//! the single goal value. The CSV backend is the real one; the in-memory
//! backend exists so the whole app can run, top-to-bottom, without touching
//! the filesystem tables.

mod csv_store;
pub(crate) mod mem;

pub(crate) use csv_store::CsvStore;
pub(crate) use mem::MemStore;

use crate::model::Table;
use crate::{Config, Result};

/// When this environment variable is set and non-zero in length, stores open
/// in `Mode::Memory` instead of `Mode::Csv`.
pub const TEST_MODE_VAR: &str = "RIDER_LEDGER_IN_TEST_MODE";

/// Selects the storage backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Mode {
    /// CSV files in the data directory.
    #[default]
    Csv,
    /// The in-memory store, seeded with sample data.
    Memory,
}

impl Mode {
    /// Reads the mode from [`TEST_MODE_VAR`].
    pub fn from_env() -> Mode {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Memory,
            _ => Mode::Csv,
        }
    }
}

/// Raw row storage for the ledger tables.
///
/// `load` returns every row including the header row; a table that does not
/// exist yet yields an empty vec. Backend failures are returned as errors,
/// never swallowed into an empty result.
#[async_trait::async_trait]
pub(crate) trait TableStore: Send {
    /// All rows of `table`, header first. Empty when the table is absent.
    async fn load(&mut self, table: Table) -> Result<Vec<Vec<String>>>;

    /// Appends one row, writing the current-schema header first when the
    /// table is empty or absent.
    async fn append(&mut self, table: Table, row: Vec<String>) -> Result<()>;

    /// Clears the table and rewrites the header plus `rows`.
    async fn replace_all(&mut self, table: Table, rows: Vec<Vec<String>>) -> Result<()>;

    /// The stored goal value, verbatim. `None` when absent.
    async fn read_goal(&mut self) -> Result<Option<String>>;

    /// Overwrites the stored goal value.
    async fn write_goal(&mut self, value: String) -> Result<()>;
}

/// Opens the backend selected by `mode` for the data directory in `config`.
pub(crate) fn open(config: &Config, mode: Mode) -> Box<dyn TableStore + Send> {
    match mode {
        Mode::Csv => Box::new(CsvStore::new(config)),
        Mode::Memory => Box::new(MemStore::new(config.root().display().to_string())),
    }
}
