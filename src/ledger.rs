//! The `Ledger` is the typed, owner-partitioned view over a raw `TableStore`.
//!
//! Every operation receives its caller identity from the `Owner` the ledger
//! was opened with. Reads return only the caller's rows. Writes that rewrite
//! the table first re-read it unfiltered, keep every other owner's rows
//! verbatim, and re-stamp the caller's identity onto the caller's rows, so a
//! write by one owner can never drop or corrupt another owner's data. That is
//! the one invariant this crate actually has to keep.
//!
//! Concurrent writers remain last-writer-wins at table granularity; there is
//! no locking or conflict detection. The pre-replace snapshots taken by the
//! CSV store are the mitigation.

use crate::model::schema::{self, SchemaVersion};
use crate::model::{cell, parse_goal, Amount, Owner, Record, Table};
use crate::store::{self, Mode, TableStore};
use crate::{Config, Result};
use anyhow::bail;
use tracing::debug;

pub struct Ledger {
    store: Box<dyn TableStore + Send>,
    owner: Owner,
}

impl Ledger {
    /// Opens the backend selected by `mode` with `owner` as the caller
    /// identity for every subsequent operation.
    pub fn open(config: &Config, owner: Owner, mode: Mode) -> Self {
        Self {
            store: store::open(config, mode),
            owner,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_store(store: Box<dyn TableStore + Send>, owner: Owner) -> Self {
        Self { store, owner }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Loads a table and brings every row to the current schema. Legacy rows
    /// come back stamped with the caller's identity and freshly minted ids;
    /// they are only persisted in that form by [`Ledger::migrate`].
    async fn rows_current(&mut self, table: Table) -> Result<(SchemaVersion, Vec<Vec<String>>)> {
        let mut raw = self.store.load(table).await?;
        if raw.is_empty() {
            return Ok((SchemaVersion::V2, Vec::new()));
        }
        let header = raw.remove(0);
        let version = schema::detect_version(&header);
        let rows = raw
            .into_iter()
            .map(|row| schema::upgrade_row(table, version, row, &self.owner))
            .collect();
        Ok((version, rows))
    }

    fn is_mine(&self, row: &[String]) -> bool {
        self.owner.matches(cell(row, 1), cell(row, 2))
    }

    /// The caller's entries, oldest first in storage order.
    pub async fn load<R: Record>(&mut self) -> Result<Vec<R>> {
        let (_, rows) = self.rows_current(R::TABLE).await?;
        Ok(rows
            .iter()
            .filter(|row| self.is_mine(row))
            .map(|row| R::from_row(row))
            .collect())
    }

    /// Appends one entry, stamping the caller's identity and a fresh entry id
    /// and recomputing derived fields. Returns the minted id.
    pub async fn append<R: Record>(&mut self, mut entry: R) -> Result<String> {
        let raw = self.store.load(R::TABLE).await?;
        if let Some(header) = raw.first() {
            if schema::detect_version(header) == SchemaVersion::V1 {
                bail!(
                    "The {} table uses the legacy schema, run 'rider migrate' first",
                    R::TABLE
                );
            }
        }
        let id = schema::new_entry_id();
        entry.stamp(id.clone(), self.owner.clone());
        entry.finalize();
        self.store.append(R::TABLE, entry.to_row()).await?;
        Ok(id)
    }

    /// Replaces the caller's partition of the table with `entries`.
    ///
    /// Rows owned by anyone else are carried over untouched. The supplied
    /// entries are forcibly re-stamped with the caller's identity (an edited
    /// entry cannot be pushed into another owner's partition) and their
    /// derived fields recomputed before the table is rewritten.
    pub async fn replace<R: Record>(&mut self, entries: Vec<R>) -> Result<()> {
        let (_, rows) = self.rows_current(R::TABLE).await?;
        let mut merged: Vec<Vec<String>> =
            rows.into_iter().filter(|row| !self.is_mine(row)).collect();
        let kept_others = merged.len();

        for mut entry in entries {
            let id = if entry.entry_id().is_empty() {
                schema::new_entry_id()
            } else {
                entry.entry_id().to_string()
            };
            entry.stamp(id, self.owner.clone());
            entry.finalize();
            merged.push(entry.to_row());
        }
        debug!(
            "Rewriting {} with {} rows ({kept_others} kept from other owners)",
            R::TABLE,
            merged.len()
        );
        self.store.replace_all(R::TABLE, merged).await
    }

    /// Deletes one of the caller's entries by id. Errors when the id does not
    /// exist within the caller's partition.
    pub async fn delete<R: Record>(&mut self, entry_id: &str) -> Result<()> {
        let entries: Vec<R> = self.load().await?;
        let before = entries.len();
        let remaining: Vec<R> = entries
            .into_iter()
            .filter(|e| e.entry_id() != entry_id)
            .collect();
        if remaining.len() == before {
            bail!("No {} entry with id '{entry_id}'", R::TABLE);
        }
        self.replace(remaining).await
    }

    /// Applies `edit` to one of the caller's entries by id and writes the
    /// reconciled table back. Returns the updated entry.
    pub async fn update<R: Record>(
        &mut self,
        entry_id: &str,
        edit: impl FnOnce(&mut R),
    ) -> Result<R> {
        let mut entries: Vec<R> = self.load().await?;
        let Some(target) = entries.iter_mut().find(|e| e.entry_id() == entry_id) else {
            bail!("No {} entry with id '{entry_id}'", R::TABLE);
        };
        edit(target);
        target.finalize();
        let updated = target.clone();
        self.replace(entries).await?;
        Ok(updated)
    }

    /// Upgrades a legacy table to the current schema, minting entry ids and
    /// stamping the caller as owner of every row. Returns the number of rows
    /// migrated; zero means the table was already current (or empty).
    pub async fn migrate<R: Record>(&mut self) -> Result<usize> {
        let (version, rows) = self.rows_current(R::TABLE).await?;
        if version == SchemaVersion::V2 {
            return Ok(0);
        }
        let out: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let mut entry = R::from_row(row);
                entry.finalize();
                entry.to_row()
            })
            .collect();
        let count = out.len();
        self.store.replace_all(R::TABLE, out).await?;
        Ok(count)
    }

    /// The stored goal, or the default when absent or unparsable.
    pub async fn goal(&mut self) -> Result<Amount> {
        Ok(parse_goal(self.store.read_goal().await?))
    }

    /// Overwrites the stored goal.
    pub async fn set_goal(&mut self, amount: Amount) -> Result<()> {
        self.store.write_goal(amount.to_storage()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DepositEntry, DepositSource, RevenueEntry};
    use crate::store::mem::{MemState, MemStore};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    /// A ledger over a fresh, empty in-memory state.
    fn ledger(key: &str, owner: Owner) -> Ledger {
        MemStore::set_state(key, MemState::default());
        Ledger::with_store(Box::new(MemStore::new(key)), owner)
    }

    /// A second ledger over the same state as an existing one.
    fn reopen(key: &str, owner: Owner) -> Ledger {
        Ledger::with_store(Box::new(MemStore::new(key)), owner)
    }

    fn deposit(date_s: &str, amount: i64) -> DepositEntry {
        DepositEntry::new(
            date(date_s),
            DepositSource::Coupang,
            Amount::new(amount),
            "",
        )
    }

    #[tokio::test]
    async fn test_append_stamps_and_load_round_trips() {
        let mut ledger = ledger("ledger-append", Owner::new("kim", "1234"));
        let id = ledger.append(deposit("2026-08-01", 10_000)).await.unwrap();
        assert!(!id.is_empty());

        let entries: Vec<DepositEntry> = ledger.load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_id(), id);
        assert_eq!(entries[0].owner(), &Owner::new("kim", "1234"));
        assert_eq!(entries[0].amount(), Amount::new(10_000));
    }

    #[tokio::test]
    async fn test_partitioned_load_never_returns_other_owners() {
        let key = "ledger-partition-load";
        let mut kim = ledger(key, Owner::new("kim", "1234"));
        kim.append(deposit("2026-08-01", 10_000)).await.unwrap();

        let mut lee = reopen(key, Owner::new("lee", "9999"));
        lee.append(deposit("2026-08-02", 20_000)).await.unwrap();

        let kim_rows: Vec<DepositEntry> = kim.load().await.unwrap();
        assert_eq!(kim_rows.len(), 1);
        assert_eq!(kim_rows[0].amount(), Amount::new(10_000));

        // Same nickname with a different passcode is a different partition.
        let mut impostor = reopen(key, Owner::new("kim", "wrong"));
        let rows: Vec<DepositEntry> = impostor.load().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_replace_preserves_other_owners_rows() {
        let key = "ledger-partition-replace";
        let mut kim = ledger(key, Owner::new("kim", "1234"));
        kim.append(deposit("2026-08-01", 10_000)).await.unwrap();
        let mut lee = reopen(key, Owner::new("lee", "9999"));
        lee.append(deposit("2026-08-02", 20_000)).await.unwrap();

        // Kim wipes their own partition.
        kim.replace::<DepositEntry>(vec![]).await.unwrap();

        let kim_rows: Vec<DepositEntry> = kim.load().await.unwrap();
        assert!(kim_rows.is_empty());
        let lee_rows: Vec<DepositEntry> = lee.load().await.unwrap();
        assert_eq!(lee_rows.len(), 1);
        assert_eq!(lee_rows[0].amount(), Amount::new(20_000));
    }

    #[tokio::test]
    async fn test_replace_restamps_foreign_identity() {
        let key = "ledger-restamp";
        let mut kim = ledger(key, Owner::new("kim", "1234"));

        // An entry parsed from a row carrying someone else's identity cannot
        // be written into their partition.
        let row = strings(&[
            "stolen-id", "lee", "9999", "2026-08-01", "coupang", "10000", "",
        ]);
        let foreign = DepositEntry::from_row(&row);
        kim.replace(vec![foreign]).await.unwrap();

        let mut lee = reopen(key, Owner::new("lee", "9999"));
        let lee_rows: Vec<DepositEntry> = lee.load().await.unwrap();
        assert!(lee_rows.is_empty());
        let kim_rows: Vec<DepositEntry> = kim.load().await.unwrap();
        assert_eq!(kim_rows.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let key = "ledger-delete";
        let mut ledger = ledger(key, Owner::new("kim", "1234"));
        let id_a = ledger.append(deposit("2026-08-01", 10_000)).await.unwrap();
        let id_b = ledger.append(deposit("2026-08-02", 20_000)).await.unwrap();

        ledger.delete::<DepositEntry>(&id_a).await.unwrap();
        let rows: Vec<DepositEntry> = ledger.load().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry_id(), id_b);

        // Deleting a missing id is an error, not a silent no-op.
        let err = ledger.delete::<DepositEntry>(&id_a).await.unwrap_err();
        assert!(err.to_string().contains("No deposits entry"));
    }

    #[tokio::test]
    async fn test_delete_cannot_cross_partitions() {
        let key = "ledger-delete-cross";
        let mut kim = ledger(key, Owner::new("kim", "1234"));
        let kim_id = kim.append(deposit("2026-08-01", 10_000)).await.unwrap();

        let mut lee = reopen(key, Owner::new("lee", "9999"));
        assert!(lee.delete::<DepositEntry>(&kim_id).await.is_err());
        let kim_rows: Vec<DepositEntry> = kim.load().await.unwrap();
        assert_eq!(kim_rows.len(), 1);
    }

    #[tokio::test]
    async fn test_update_recomputes_derived_fields() {
        let key = "ledger-update";
        let mut ledger = ledger(key, Owner::new("kim", "1234"));
        let entry = RevenueEntry::new(
            date("2026-08-27"),
            Amount::new(30_000),
            Amount::new(20_000),
            Amount::new(10_000),
            5,
            "",
            "",
        );
        let id = ledger.append(entry).await.unwrap();

        let updated = ledger
            .update::<RevenueEntry>(&id, |e| {
                e.edit(None, None, None, Some(Amount::new(0)), None, None, None)
            })
            .await
            .unwrap();
        assert_eq!(updated.net(), Amount::new(50_000));

        let rows: Vec<RevenueEntry> = ledger.load().await.unwrap();
        assert_eq!(rows[0].net(), Amount::new(50_000));
    }

    #[tokio::test]
    async fn test_load_migrates_legacy_rows_in_memory() {
        let key = "ledger-legacy-load";
        MemStore::set_state(key, MemState::default());
        // Seed a V1 (legacy) revenue table with a stale stored net.
        let mut tables = HashMap::new();
        tables.insert(
            Table::Revenue,
            vec![
                Table::Revenue
                    .legacy_headers()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                strings(&[
                    "2026-08-27", "30000", "20000", "0", "10000", "0", "5", "82km", "",
                ]),
            ],
        );
        MemStore::set_state(key, MemState { tables, goal: None });

        let mut ledger = reopen(key, Owner::new("kim", "1234"));
        let rows: Vec<RevenueEntry> = ledger.load().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].net(), Amount::new(40_000));
        assert_eq!(rows[0].owner(), &Owner::new("kim", "1234"));

        // Appending into the legacy table is refused until migration.
        let entry = RevenueEntry::new(
            date("2026-08-28"),
            Amount::new(1_000),
            Amount::new(0),
            Amount::new(0),
            1,
            "",
            "",
        );
        let err = ledger.append(entry).await.unwrap_err();
        assert!(err.to_string().contains("rider migrate"));

        // Migration persists the upgrade and reports the row count.
        let migrated = ledger.migrate::<RevenueEntry>().await.unwrap();
        assert_eq!(migrated, 1);
        assert_eq!(ledger.migrate::<RevenueEntry>().await.unwrap(), 0);

        let state = MemStore::get_state(key);
        let stored = &state.tables[&Table::Revenue];
        assert_eq!(stored[0], Table::Revenue.headers());
        assert_eq!(stored[1][1], "kim");
        assert!(!stored[1][0].is_empty());
        // Derived net was recomputed during the migration.
        assert_eq!(stored[1][8], "40000");
    }

    #[tokio::test]
    async fn test_goal_default_and_round_trip() {
        let key = "ledger-goal";
        let mut ledger = ledger(key, Owner::new("kim", "1234"));
        assert_eq!(ledger.goal().await.unwrap(), crate::model::DEFAULT_GOAL);

        ledger.set_goal(Amount::new(2_500_000)).await.unwrap();
        assert_eq!(ledger.goal().await.unwrap(), Amount::new(2_500_000));
    }
}
