//! Types that represent the core data model: the three entry kinds, the
//! `Amount` money type, the owner partition key, and the versioned table
//! schemas.

mod amount;
mod deposit;
mod goal;
mod maintenance;
mod owner;
mod revenue;
pub(crate) mod schema;

pub use amount::{average_unit_price, Amount};
pub use deposit::{DepositEntry, DepositSource};
pub use goal::{parse_goal, progress, DEFAULT_GOAL};
pub use maintenance::{MaintenanceEntry, MaintenanceItem};
pub use owner::Owner;
pub use revenue::RevenueEntry;
pub use schema::Table;

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use tracing::warn;

/// One row of a ledger table, in its typed form.
///
/// A `Record` maps to and from a row in the current schema version. `from_row`
/// is lossy by policy: the row has already been conformed to the declared
/// column count, and unparsable cells degrade to defaults rather than failing
/// the load. Derived fields are recomputed by `finalize` and never trusted
/// from storage.
pub trait Record: Sized + Clone + Debug + Serialize {
    const TABLE: Table;

    /// Parses a row that has been conformed to the current schema width.
    fn from_row(row: &[String]) -> Self;

    /// Renders the entry as a row in the current schema.
    fn to_row(&self) -> Vec<String>;

    fn entry_id(&self) -> &str;

    fn owner(&self) -> &Owner;

    fn date(&self) -> NaiveDate;

    /// Stamps the identity columns before a write.
    fn stamp(&mut self, entry_id: String, owner: Owner);

    /// Recomputes derived fields from primitive inputs. The default is a
    /// no-op for entry kinds with no derived fields.
    fn finalize(&mut self) {}

    /// One-line human-readable summary used by the `list` command.
    fn describe(&self) -> String;
}

/// Fetches a cell by index, empty when absent.
pub(crate) fn cell(row: &[String], ix: usize) -> &str {
    row.get(ix).map(String::as_str).unwrap_or_default()
}

/// Parses a stored date cell, coercing anything unparsable to the epoch date.
pub(crate) fn parse_date_lossy(s: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            if !s.trim().is_empty() {
                warn!("Coercing unparsable date '{s}'");
            }
            NaiveDate::default()
        }
    }
}

/// Parses a stored count cell, coercing anything unparsable to zero.
pub(crate) fn parse_count_lossy(s: &str) -> u32 {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<u32>() {
        Ok(count) => count,
        Err(_) => {
            if !cleaned.is_empty() {
                warn!("Coercing unparsable count '{s}' to 0");
            }
            0
        }
    }
}
