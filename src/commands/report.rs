//! Report command handler.

use crate::args::ReportArgs;
use crate::commands::Out;
use crate::model::{self, average_unit_price, Amount, Owner, Record, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};
use chrono::Local;
use serde::Serialize;

/// One month of the caller's revenue, aggregated against the goal.
#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    month: String,
    days: usize,
    total: Amount,
    expense: Amount,
    net: Amount,
    deliveries: u32,
    average_unit_price: Amount,
    goal: Amount,
    /// Net over goal, clamped to [0, 1].
    progress: f64,
}

impl MonthReport {
    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn net(&self) -> Amount {
        self.net
    }

    pub fn deliveries(&self) -> u32 {
        self.deliveries
    }

    pub fn average_unit_price(&self) -> Amount {
        self.average_unit_price
    }

    pub fn goal(&self) -> Amount {
        self.goal
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}

/// Summarizes the caller's revenue for a month: totals, average unit price
/// and progress toward the monthly net goal. Defaults to the current month.
pub async fn report(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: ReportArgs,
) -> Result<Out<MonthReport>> {
    let month = match args.month() {
        Some(month) => month.to_string(),
        None => Local::now().format("%Y-%m").to_string(),
    };

    let mut ledger = Ledger::open(&config, owner, mode);
    let entries: Vec<RevenueEntry> = ledger.load().await?;
    let month_entries: Vec<&RevenueEntry> = entries
        .iter()
        .filter(|e| e.date().format("%Y-%m").to_string() == month)
        .collect();

    let total: Amount = month_entries.iter().map(|e| e.total()).sum();
    let expense: Amount = month_entries.iter().map(|e| e.expense()).sum();
    let net: Amount = month_entries.iter().map(|e| e.net()).sum();
    let deliveries: u32 = month_entries.iter().map(|e| e.deliveries()).sum();
    let goal = ledger.goal().await?;
    let progress = model::progress(net, goal);

    let summary = MonthReport {
        month: month.clone(),
        days: month_entries.len(),
        total,
        expense,
        net,
        deliveries,
        average_unit_price: average_unit_price(total, deliveries),
        goal,
        progress,
    };
    let message = format!(
        "{month}: net {net} from {deliveries} deliveries over {} day{} ({:.0}% of the {goal} goal)",
        summary.days,
        if summary.days == 1 { "" } else { "s" },
        progress * 100.0,
    );
    Ok(Out::new(message, summary))
}
