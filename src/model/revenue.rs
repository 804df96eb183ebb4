//! The daily revenue entry and its derived-field arithmetic.

use crate::model::schema::Table;
use crate::model::{
    average_unit_price, cell, parse_count_lossy, parse_date_lossy, Amount, Owner, Record,
};
use chrono::NaiveDate;
use serde::Serialize;

/// One day of platform income.
///
/// `total` and `net` are derived: `total = coupang + baemin` and
/// `net = total - expense`. They are recomputed from the primitive fields at
/// every parse and before every write, so a stored value that disagrees is
/// silently corrected. Legacy rows without an expense column conform with
/// `expense = 0`, which degrades `net` to `total`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevenueEntry {
    entry_id: String,
    #[serde(flatten)]
    owner: Owner,
    date: NaiveDate,
    coupang: Amount,
    baemin: Amount,
    total: Amount,
    expense: Amount,
    net: Amount,
    deliveries: u32,
    distance: String,
    memo: String,
}

impl RevenueEntry {
    /// Creates an entry from form inputs. Identity columns are stamped by the
    /// ledger at write time.
    pub fn new(
        date: NaiveDate,
        coupang: Amount,
        baemin: Amount,
        expense: Amount,
        deliveries: u32,
        distance: impl Into<String>,
        memo: impl Into<String>,
    ) -> Self {
        let mut entry = Self {
            entry_id: String::new(),
            owner: Owner::default(),
            date,
            coupang,
            baemin,
            total: Amount::default(),
            expense,
            net: Amount::default(),
            deliveries,
            distance: distance.into(),
            memo: memo.into(),
        };
        entry.finalize();
        entry
    }

    pub fn coupang(&self) -> Amount {
        self.coupang
    }

    pub fn baemin(&self) -> Amount {
        self.baemin
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn expense(&self) -> Amount {
        self.expense
    }

    pub fn net(&self) -> Amount {
        self.net
    }

    pub fn deliveries(&self) -> u32 {
        self.deliveries
    }

    pub fn average_unit_price(&self) -> Amount {
        average_unit_price(self.total, self.deliveries)
    }

    /// Applies an in-place edit. `None` keeps the existing value.
    #[allow(clippy::too_many_arguments)]
    pub fn edit(
        &mut self,
        date: Option<NaiveDate>,
        coupang: Option<Amount>,
        baemin: Option<Amount>,
        expense: Option<Amount>,
        deliveries: Option<u32>,
        distance: Option<String>,
        memo: Option<String>,
    ) {
        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = coupang {
            self.coupang = v;
        }
        if let Some(v) = baemin {
            self.baemin = v;
        }
        if let Some(v) = expense {
            self.expense = v;
        }
        if let Some(v) = deliveries {
            self.deliveries = v;
        }
        if let Some(v) = distance {
            self.distance = v;
        }
        if let Some(v) = memo {
            self.memo = v;
        }
        self.finalize();
    }
}

impl Record for RevenueEntry {
    const TABLE: Table = Table::Revenue;

    fn from_row(row: &[String]) -> Self {
        let mut entry = Self {
            entry_id: cell(row, 0).to_string(),
            owner: Owner::new(cell(row, 1), cell(row, 2)),
            date: parse_date_lossy(cell(row, 3)),
            coupang: Amount::parse_lossy(cell(row, 4)),
            baemin: Amount::parse_lossy(cell(row, 5)),
            // Columns 6 and 8 hold the stored total and net; both are
            // recomputed below rather than read.
            total: Amount::default(),
            expense: Amount::parse_lossy(cell(row, 7)),
            net: Amount::default(),
            deliveries: parse_count_lossy(cell(row, 9)),
            distance: cell(row, 10).to_string(),
            memo: cell(row, 11).to_string(),
        };
        entry.finalize();
        entry
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.entry_id.clone(),
            self.owner.nickname().to_string(),
            self.owner.passcode().to_string(),
            self.date.format("%Y-%m-%d").to_string(),
            self.coupang.to_storage(),
            self.baemin.to_storage(),
            self.total.to_storage(),
            self.expense.to_storage(),
            self.net.to_storage(),
            self.deliveries.to_string(),
            self.distance.clone(),
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

    fn finalize(&mut self) {
        self.total = self.coupang + self.baemin;
        self.net = self.total - self.expense;
    }

    fn describe(&self) -> String {
        format!(
            "{}  {}  net {} won  ({} deliveries)",
            self.entry_id,
            self.date.format("%Y-%m-%d"),
            self.net,
            self.deliveries
        )
    }
}
