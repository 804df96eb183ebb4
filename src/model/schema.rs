//! Versioned column schemas for the three ledger tables.
//!
//! Each table has a declared header list per schema version. V1 is the legacy
//! single-user layout (no entry id, no owner columns). V2, the current
//! layout, prefixes `Entry ID`, `Owner` and
//! `Passcode` so that rows can be addressed by a stable identifier and
//! partitioned by owner. Loading conforms every row to the declared column
//! count by padding or truncating; upgrading a V1 table mints ids and stamps
//! the calling owner.

use crate::model::Owner;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Columns prefixed to every table in the current schema version.
const V2_PREFIX: &[&str] = &["Entry ID", "Owner", "Passcode"];

const REVENUE_V1: &[&str] = &[
    "Date",
    "Coupang Income",
    "Baemin Income",
    "Total",
    "Expense",
    "Net",
    "Deliveries",
    "Distance",
    "Memo",
];

const DEPOSITS_V1: &[&str] = &["Date", "Source", "Amount", "Memo"];

const MAINTENANCE_V1: &[&str] = &["Date", "Item", "Cost", "Odometer", "Memo"];

/// Identifies one of the three ledger tables.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Revenue,
    Deposits,
    Maintenance,
}

serde_plain::derive_display_from_serialize!(Table);
serde_plain::derive_fromstr_from_deserialize!(Table);

impl Table {
    /// The backing file name in the CSV store.
    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }

    /// The legacy (V1) header list.
    pub fn legacy_headers(&self) -> &'static [&'static str] {
        match self {
            Table::Revenue => REVENUE_V1,
            Table::Deposits => DEPOSITS_V1,
            Table::Maintenance => MAINTENANCE_V1,
        }
    }

    /// The current (V2) header list.
    pub fn headers(&self) -> Vec<String> {
        V2_PREFIX
            .iter()
            .chain(self.legacy_headers())
            .map(|s| s.to_string())
            .collect()
    }

    /// Number of columns in the current schema.
    pub fn width(&self) -> usize {
        V2_PREFIX.len() + self.legacy_headers().len()
    }
}

/// A table's detected schema version.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum SchemaVersion {
    /// Legacy layout: data columns only.
    V1,
    /// Current layout: `Entry ID`, `Owner`, `Passcode`, then the data columns.
    V2,
}

/// Detects the schema version from a header row.
///
/// Any header that does not start with the V2 prefix is treated as V1; schema
/// drift within a version is absorbed by [`conform`].
pub fn detect_version(header: &[String]) -> SchemaVersion {
    let prefix: Vec<&str> = header.iter().take(V2_PREFIX.len()).map(|s| s.as_str()).collect();
    if prefix == V2_PREFIX {
        SchemaVersion::V2
    } else {
        SchemaVersion::V1
    }
}

/// Pads or truncates a row to exactly `width` columns.
pub fn conform(table: Table, mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() != width {
        warn!(
            "Conforming a {table} row with {} columns to the declared {width}",
            row.len()
        );
    }
    row.resize(width, String::new());
    row
}

/// Upgrades one stored row to the current schema.
///
/// A V1 row has no id and no owner: the upgrade mints a fresh entry id and
/// stamps `owner`, i.e. a legacy single-user table is adopted wholesale by the
/// caller that migrates it. V2 rows are conformed in place.
pub fn upgrade_row(
    table: Table,
    version: SchemaVersion,
    row: Vec<String>,
    owner: &Owner,
) -> Vec<String> {
    match version {
        SchemaVersion::V2 => conform(table, row, table.width()),
        SchemaVersion::V1 => {
            let data = conform(table, row, table.legacy_headers().len());
            let mut upgraded = vec![
                new_entry_id(),
                owner.nickname().to_string(),
                owner.passcode().to_string(),
            ];
            upgraded.extend(data);
            upgraded
        }
    }
}

/// Mints a stable identifier for a new row.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version() {
        let v2: Vec<String> = Table::Revenue.headers();
        assert_eq!(detect_version(&v2), SchemaVersion::V2);

        let v1: Vec<String> = REVENUE_V1.iter().map(|s| s.to_string()).collect();
        assert_eq!(detect_version(&v1), SchemaVersion::V1);

        // Unknown headers are treated as legacy, not rejected.
        let odd = vec!["날짜".to_string(), "쿠팡수입".to_string()];
        assert_eq!(detect_version(&odd), SchemaVersion::V1);
    }

    #[test]
    fn test_conform_pads_and_truncates() {
        let short = vec!["2026-01-02".to_string()];
        let padded = conform(Table::Deposits, short, 4);
        assert_eq!(padded.len(), 4);
        assert_eq!(padded[0], "2026-01-02");
        assert_eq!(padded[3], "");

        let long: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let truncated = conform(Table::Deposits, long, 4);
        assert_eq!(truncated.len(), 4);
        assert_eq!(truncated[3], "3");
    }

    #[test]
    fn test_upgrade_v1_row() {
        let owner = Owner::new("kim", "1234");
        let row: Vec<String> = vec!["2026-01-02", "쿠팡", "50000", "memo"]
            .into_iter()
            .map(String::from)
            .collect();
        let upgraded = upgrade_row(Table::Deposits, SchemaVersion::V1, row, &owner);
        assert_eq!(upgraded.len(), Table::Deposits.width());
        assert!(!upgraded[0].is_empty()); // minted id
        assert_eq!(upgraded[1], "kim");
        assert_eq!(upgraded[2], "1234");
        assert_eq!(upgraded[3], "2026-01-02");
    }

    #[test]
    fn test_upgrade_v2_row_is_conform_only() {
        let owner = Owner::new("kim", "1234");
        let mut row = vec!["id-1".to_string(), "lee".to_string(), "x".to_string()];
        row.extend(vec![String::new(); Table::Deposits.legacy_headers().len()]);
        let upgraded = upgrade_row(Table::Deposits, SchemaVersion::V2, row, &owner);
        // An existing V2 row keeps its own id and owner.
        assert_eq!(upgraded[0], "id-1");
        assert_eq!(upgraded[1], "lee");
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Revenue.to_string(), "revenue");
        assert_eq!(Table::Maintenance.file_name(), "maintenance.csv");
        assert_eq!("deposits".parse::<Table>().unwrap(), Table::Deposits);
    }
}
