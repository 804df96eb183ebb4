//! Vehicle maintenance and expense entries.

use crate::model::schema::Table;
use crate::model::{cell, parse_date_lossy, Amount, Owner, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What was serviced or paid for.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceItem {
    Fuel,
    OilChange,
    BrakePads,
    Tires,
    DriveBelt,
    Insurance,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(MaintenanceItem);
serde_plain::derive_fromstr_from_deserialize!(MaintenanceItem);

impl MaintenanceItem {
    /// Parses a stored cell, coercing anything unrecognized to `Other`.
    fn parse_lossy(s: &str) -> Self {
        match s.parse::<MaintenanceItem>() {
            Ok(item) => item,
            Err(_) => {
                if !s.trim().is_empty() {
                    warn!("Coercing unrecognized maintenance item '{s}' to 'other'");
                }
                MaintenanceItem::Other
            }
        }
    }
}

/// One maintenance event.
///
/// The odometer reading is free text; it is carried for reference and never
/// computed with.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaintenanceEntry {
    entry_id: String,
    #[serde(flatten)]
    owner: Owner,
    date: NaiveDate,
    item: MaintenanceItem,
    cost: Amount,
    odometer: String,
    memo: String,
}

impl MaintenanceEntry {
    pub fn new(
        date: NaiveDate,
        item: MaintenanceItem,
        cost: Amount,
        odometer: impl Into<String>,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: String::new(),
            owner: Owner::default(),
            date,
            item,
            cost,
            odometer: odometer.into(),
            memo: memo.into(),
        }
    }

    pub fn item(&self) -> MaintenanceItem {
        self.item
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    /// Applies an in-place edit. `None` keeps the existing value.
    pub fn edit(
        &mut self,
        date: Option<NaiveDate>,
        item: Option<MaintenanceItem>,
        cost: Option<Amount>,
        odometer: Option<String>,
        memo: Option<String>,
    ) {
        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = item {
            self.item = v;
        }
        if let Some(v) = cost {
            self.cost = v;
        }
        if let Some(v) = odometer {
            self.odometer = v;
        }
        if let Some(v) = memo {
            self.memo = v;
        }
    }
}

impl Record for MaintenanceEntry {
    const TABLE: Table = Table::Maintenance;

    fn from_row(row: &[String]) -> Self {
        Self {
            entry_id: cell(row, 0).to_string(),
            owner: Owner::new(cell(row, 1), cell(row, 2)),
            date: parse_date_lossy(cell(row, 3)),
            item: MaintenanceItem::parse_lossy(cell(row, 4)),
            cost: Amount::parse_lossy(cell(row, 5)),
            odometer: cell(row, 6).to_string(),
            memo: cell(row, 7).to_string(),
        }
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.entry_id.clone(),
            self.owner.nickname().to_string(),
            self.owner.passcode().to_string(),
            self.date.format("%Y-%m-%d").to_string(),
            self.item.to_string(),
            self.cost.to_storage(),
            self.odometer.clone(),
            self.memo.clone(),
        ]
    }

    fn entry_id(&self) -> &str {
        &self.entry_id
    }

    fn owner(&self) -> &Owner {
        &self.owner
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn stamp(&mut self, entry_id: String, owner: Owner) {
        self.entry_id = entry_id;
        self.owner = owner;
    }

    fn describe(&self) -> String {
        format!(
            "{}  {}  {}: {} won",
            self.entry_id,
            self.date.format("%Y-%m-%d"),
            self.item,
            self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_strings() {
        assert_eq!(MaintenanceItem::OilChange.to_string(), "oil_change");
        assert_eq!(
            "brake_pads".parse::<MaintenanceItem>().unwrap(),
            MaintenanceItem::BrakePads
        );
        assert_eq!(
            MaintenanceItem::parse_lossy("휘발유"),
            MaintenanceItem::Other
        );
    }

    #[test]
    fn test_row_round_trip() {
        let date = NaiveDate::parse_from_str("2026-08-15", "%Y-%m-%d").unwrap();
        let mut entry = MaintenanceEntry::new(
            date,
            MaintenanceItem::Tires,
            Amount::new(120_000),
            "35,420km",
            "rear",
        );
        entry.stamp("mnt-1".to_string(), Owner::new("kim", "1234"));
        let row = entry.to_row();
        assert_eq!(row.len(), Table::Maintenance.width());
        let parsed = MaintenanceEntry::from_row(&row);
        assert_eq!(parsed.item(), MaintenanceItem::Tires);
        assert_eq!(parsed.cost(), Amount::new(120_000));
        assert_eq!(parsed.entry_id(), "mnt-1");
    }
}
