//! Implements the `TableStore` trait over per-table CSV files plus a
//! plain-text goal file.

use crate::backup::Backup;
use crate::model::Table;
use crate::store::TableStore;
use crate::{utils, Config, Result};
use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, trace};

/// One CSV file per table under `tables/`, `goal.txt` at the data-dir root.
///
/// `replace_all` snapshots the previous file into the backups directory and
/// writes the replacement through a temp file + rename, so a failed write
/// never leaves a half-written table behind.
pub(crate) struct CsvStore {
    tables_dir: PathBuf,
    goal_path: PathBuf,
    backup: Backup,
}

impl CsvStore {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            tables_dir: config.tables().to_path_buf(),
            goal_path: config.goal_path().to_path_buf(),
            backup: config.backup(),
        }
    }

    fn table_path(&self, table: Table) -> PathBuf {
        self.tables_dir.join(table.file_name())
    }
}

#[async_trait::async_trait]
impl TableStore for CsvStore {
    async fn load(&mut self, table: Table) -> Result<Vec<Vec<String>>> {
        trace!("load {table}");
        let path = self.table_path(table);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read table file {}", path.display()))?;
        parse_csv(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
    }

    async fn append(&mut self, table: Table, row: Vec<String>) -> Result<()> {
        trace!("append to {table}");
        let path = self.table_path(table);
        let empty = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let mut rows = Vec::new();
        if empty {
            // Header first when the table is created by this append.
            rows.push(table.headers());
        }
        rows.push(row);
        let bytes = render_csv(&rows)?;

        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open table file {}", path.display()))?;
        file.write_all(&bytes)
            .await
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        Ok(())
    }

    async fn replace_all(&mut self, table: Table, rows: Vec<Vec<String>>) -> Result<()> {
        trace!("replace_all on {table} with {} rows", rows.len());
        let path = self.table_path(table);

        if path.is_file() {
            let snapshot = self.backup.snapshot(&path, &table.to_string()).await?;
            debug!("Saved pre-replace snapshot to {}", snapshot.display());
        }

        let mut all = Vec::with_capacity(rows.len() + 1);
        all.push(table.headers());
        all.extend(rows);
        let bytes = render_csv(&all)?;

        let tmp = self.tables_dir.join(format!("{}.tmp", table.file_name()));
        utils::write(&tmp, bytes).await?;
        utils::rename(&tmp, &path).await
    }

    async fn read_goal(&mut self) -> Result<Option<String>> {
        if !self.goal_path.is_file() {
            return Ok(None);
        }
        let value = utils::read(&self.goal_path).await?;
        Ok(Some(value.trim().to_string()))
    }

    async fn write_goal(&mut self, value: String) -> Result<()> {
        utils::write(&self.goal_path, value).await
    }
}

/// Parses CSV bytes into rows of strings, header included. Rows of uneven
/// length are accepted; the schema layer conforms them.
fn parse_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Renders rows to CSV bytes.
fn render_csv(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.into_inner().context("Failed to flush CSV writer")
}
