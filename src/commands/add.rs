//! Add command handlers.

use crate::args::{AddDepositArgs, AddMaintenanceArgs, AddRevenueArgs};
use crate::commands::Out;
use crate::model::{DepositEntry, MaintenanceEntry, Owner, Record, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};
use chrono::{Local, NaiveDate};

fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Records one day of platform income. Total and net are computed before the
/// row is written; the date defaults to today.
///
/// # Errors
/// - Returns an error if the table uses the legacy schema.
/// - Returns an error if the storage write fails.
pub async fn add_revenue(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: AddRevenueArgs,
) -> Result<Out<RevenueEntry>> {
    let entry = RevenueEntry::new(
        date_or_today(args.date()),
        args.coupang(),
        args.baemin(),
        args.expense(),
        args.deliveries(),
        args.distance(),
        args.memo(),
    );
    let mut ledger = Ledger::open(&config, owner, mode);
    let id = ledger.append(entry.clone()).await?;
    let message = format!(
        "Added revenue for {} (net {}) with id {id}",
        entry.date(),
        entry.net()
    );
    Ok(Out::new(message, entry))
}

/// Records a bank deposit.
pub async fn add_deposit(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: AddDepositArgs,
) -> Result<Out<DepositEntry>> {
    let entry = DepositEntry::new(
        date_or_today(args.date()),
        args.source(),
        args.amount(),
        args.memo(),
    );
    let mut ledger = Ledger::open(&config, owner, mode);
    let id = ledger.append(entry.clone()).await?;
    let message = format!(
        "Added {} deposit of {} with id {id}",
        entry.source(),
        entry.amount()
    );
    Ok(Out::new(message, entry))
}

/// Records a maintenance event.
pub async fn add_maintenance(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: AddMaintenanceArgs,
) -> Result<Out<MaintenanceEntry>> {
    let entry = MaintenanceEntry::new(
        date_or_today(args.date()),
        args.item(),
        args.cost(),
        args.odometer(),
        args.memo(),
    );
    let mut ledger = Ledger::open(&config, owner, mode);
    let id = ledger.append(entry.clone()).await?;
    let message = format!(
        "Added {} maintenance costing {} with id {id}",
        entry.item(),
        entry.cost()
    );
    Ok(Out::new(message, entry))
}
