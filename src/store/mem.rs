//! Implements the `TableStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of the app so that
//! the whole thing can run, top-to-bottom, without touching the filesystem
//! tables. States live in a process-wide registry keyed by data-dir path, so
//! every store opened for the same directory shares one state. A fresh state
//! is seeded with sample data.

use crate::model::Table;
use crate::store::TableStore;
use crate::Result;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// The full contents of one in-memory backend: raw rows per table (header
/// included) plus the goal value.
#[derive(Debug, Default, Clone)]
pub(crate) struct MemState {
    pub(crate) tables: HashMap<Table, Vec<Vec<String>>>,
    pub(crate) goal: Option<String>,
}

static REGISTRY: OnceLock<Mutex<HashMap<String, MemState>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<String, MemState>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn with_state<T>(key: &str, f: impl FnOnce(&mut MemState) -> T) -> T {
    let mut map = registry().lock().expect("mem store registry poisoned");
    let state = map.entry(key.to_string()).or_insert_with(seed_state);
    f(state)
}

/// An in-memory `TableStore`, addressed by registry key.
pub(crate) struct MemStore {
    key: String,
}

impl MemStore {
    /// Opens (and seeds, if new) the state registered under `key`.
    pub(crate) fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        with_state(&key, |_| ());
        Self { key }
    }

    /// Gets a copy of the current state. Test hook.
    pub(crate) fn get_state(key: &str) -> MemState {
        with_state(key, |state| state.clone())
    }

    /// Replaces the current state. Test hook.
    pub(crate) fn set_state(key: &str, new_state: MemState) {
        with_state(key, |state| *state = new_state);
    }
}

#[async_trait::async_trait]
impl TableStore for MemStore {
    async fn load(&mut self, table: Table) -> Result<Vec<Vec<String>>> {
        Ok(with_state(&self.key, |state| {
            state.tables.get(&table).cloned().unwrap_or_default()
        }))
    }

    async fn append(&mut self, table: Table, row: Vec<String>) -> Result<()> {
        with_state(&self.key, |state| {
            let rows = state.tables.entry(table).or_default();
            if rows.is_empty() {
                rows.push(table.headers());
            }
            rows.push(row);
        });
        Ok(())
    }

    async fn replace_all(&mut self, table: Table, rows: Vec<Vec<String>>) -> Result<()> {
        with_state(&self.key, |state| {
            let mut all = Vec::with_capacity(rows.len() + 1);
            all.push(table.headers());
            all.extend(rows);
            state.tables.insert(table, all);
        });
        Ok(())
    }

    async fn read_goal(&mut self) -> Result<Option<String>> {
        Ok(with_state(&self.key, |state| state.goal.clone()))
    }

    async fn write_goal(&mut self, value: String) -> Result<()> {
        with_state(&self.key, |state| state.goal = Some(value));
        Ok(())
    }
}

/// Builds the seed state from the CSV constants below.
fn seed_state() -> MemState {
    let mut tables = HashMap::new();
    tables.insert(Table::Revenue, load_csv(REVENUE_DATA));
    tables.insert(Table::Deposits, load_csv(DEPOSIT_DATA));
    tables.insert(Table::Maintenance, load_csv(MAINTENANCE_DATA));
    MemState {
        tables,
        goal: Some("3000000".to_string()),
    }
}

/// Loads rows from a CSV-formatted string, header included.
fn load_csv(csv_data: &str) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv_data.as_bytes());
    rdr.records()
        .map(|result| {
            let record = result.expect("seed CSV data is malformed");
            record.iter().map(|field| field.to_string()).collect()
        })
        .collect()
}

/// Seed revenue data, owned by the default identity.
const REVENUE_DATA: &str = r##"Entry ID,Owner,Passcode,Date,Coupang Income,Baemin Income,Total,Expense,Net,Deliveries,Distance,Memo
5f0c7b1e-1111-4aaa-9000-000000000001,rider,,2026-08-25,82000,61000,143000,12000,131000,31,96km,
5f0c7b1e-1111-4aaa-9000-000000000002,rider,,2026-08-26,71000,54500,125500,8000,117500,27,88km,rain
5f0c7b1e-1111-4aaa-9000-000000000003,rider,,2026-08-27,30000,20000,50000,10000,40000,5,42km,short day
"##;

/// Seed deposit data.
const DEPOSIT_DATA: &str = r##"Entry ID,Owner,Passcode,Date,Source,Amount,Memo
5f0c7b1e-2222-4aaa-9000-000000000001,rider,,2026-08-20,coupang,412000,week 33
5f0c7b1e-2222-4aaa-9000-000000000002,rider,,2026-08-21,baemin,356500,week 33
"##;

/// Seed maintenance data.
const MAINTENANCE_DATA: &str = r##"Entry ID,Owner,Passcode,Date,Item,Cost,Odometer,Memo
5f0c7b1e-3333-4aaa-9000-000000000001,rider,,2026-08-10,oil_change,38000,34100km,
5f0c7b1e-3333-4aaa-9000-000000000002,rider,,2026-08-18,fuel,21000,34700km,
"##;
