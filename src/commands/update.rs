//! Update command handlers.

use crate::args::{UpdateDepositArgs, UpdateMaintenanceArgs, UpdateRevenueArgs};
use crate::commands::Out;
use crate::model::{DepositEntry, MaintenanceEntry, Owner, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};

/// Edits one of the caller's revenue entries in place. Fields left
/// unspecified keep their values; total and net are recomputed before the
/// table is rewritten.
///
/// # Errors
/// - Returns an error if the id does not exist in the caller's partition.
/// - Returns an error if the storage write fails.
pub async fn update_revenue(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: UpdateRevenueArgs,
) -> Result<Out<RevenueEntry>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    let updated = ledger
        .update::<RevenueEntry>(args.id(), |e| {
            e.edit(
                args.date(),
                args.coupang(),
                args.baemin(),
                args.expense(),
                args.deliveries(),
                args.distance(),
                args.memo(),
            )
        })
        .await?;
    let message = format!(
        "Updated revenue entry {} (net {})",
        args.id(),
        updated.net()
    );
    Ok(Out::new(message, updated))
}

/// Edits one of the caller's deposit entries in place.
pub async fn update_deposit(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: UpdateDepositArgs,
) -> Result<Out<DepositEntry>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    let updated = ledger
        .update::<DepositEntry>(args.id(), |e| {
            e.edit(args.date(), args.source(), args.amount(), args.memo())
        })
        .await?;
    let message = format!("Updated deposit entry {}", args.id());
    Ok(Out::new(message, updated))
}

/// Edits one of the caller's maintenance entries in place.
pub async fn update_maintenance(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: UpdateMaintenanceArgs,
) -> Result<Out<MaintenanceEntry>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    let updated = ledger
        .update::<MaintenanceEntry>(args.id(), |e| {
            e.edit(
                args.date(),
                args.item(),
                args.cost(),
                args.odometer(),
                args.memo(),
            )
        })
        .await?;
    let message = format!("Updated maintenance entry {}", args.id());
    Ok(Out::new(message, updated))
}
