//! Delete command handler.

use crate::args::{DeleteArgs, EntityKind};
use crate::commands::Out;
use crate::model::{DepositEntry, MaintenanceEntry, Owner, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};

/// Deletes one of the caller's entries by id.
///
/// # Errors
/// - Returns an error if the id does not exist in the caller's partition.
///   Another owner's entry id is indistinguishable from a missing one.
/// - Returns an error if the storage write fails.
pub async fn delete(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: DeleteArgs,
) -> Result<Out<()>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    match args.entity() {
        EntityKind::Revenue => ledger.delete::<RevenueEntry>(args.id()).await?,
        EntityKind::Deposit => ledger.delete::<DepositEntry>(args.id()).await?,
        EntityKind::Maintenance => ledger.delete::<MaintenanceEntry>(args.id()).await?,
    }
    Ok(format!("Deleted entry {}", args.id()).into())
}
