//! Bank deposit entries.

use crate::model::schema::Table;
use crate::model::{cell, parse_date_lossy, Amount, Owner, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Where a deposit came from.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DepositSource {
    Coupang,
    Baemin,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(DepositSource);
serde_plain::derive_fromstr_from_deserialize!(DepositSource);

impl DepositSource {
    /// Parses a stored cell, coercing anything unrecognized to `Other`.
    fn parse_lossy(s: &str) -> Self {
        match s.parse::<DepositSource>() {
            Ok(source) => source,
            Err(_) => {
                if !s.trim().is_empty() {
                    warn!("Coercing unrecognized deposit source '{s}' to 'other'");
                }
                DepositSource::Other
            }
        }
    }
}

/// One bank deposit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DepositEntry {
    entry_id: String,
    #[serde(flatten)]
    owner: Owner,
    date: NaiveDate,
    source: DepositSource,
    amount: Amount,
    memo: String,
}

impl DepositEntry {
    pub fn new(
        date: NaiveDate,
        source: DepositSource,
        amount: Amount,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: String::new(),
            owner: Owner::default(),
            date,
            source,
            amount,
            memo: memo.into(),
        }
    }

    pub fn source(&self) -> DepositSource {
        self.source
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Applies an in-place edit. `None` keeps the existing value.
    pub fn edit(
        &mut self,
        date: Option<NaiveDate>,
        source: Option<DepositSource>,
        amount: Option<Amount>,
        memo: Option<String>,
    ) {
        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = source {
            self.source = v;
        }
        if let Some(v) = amount {
            self.amount = v;
        }
        if let Some(v) = memo {
            self.memo = v;
        }
    }
}

impl Record for DepositEntry {
    const TABLE: Table = Table::Deposits;

    fn from_row(row: &[String]) -> Self {
        Self {
            entry_id: cell(row, 0).to_string(),
            owner: Owner::new(cell(row, 1), cell(row, 2)),
            date: parse_date_lossy(cell(row, 3)),
            source: DepositSource::parse_lossy(cell(row, 4)),
            amount: Amount::parse_lossy(cell(row, 5)),
            memo: cell(row, 6).to_string(),
        }
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.entry_id.clone(),
            self.owner.nickname().to_string(),
            self.owner.passcode().to_string(),
            self.date.format("%Y-%m-%d").to_string(),
            self.source.to_string(),
            self.amount.to_storage(),
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
            "{}  {}  {} won from {}",
            self.entry_id,
            self.date.format("%Y-%m-%d"),
            self.amount,
            self.source
        )
    }
}
