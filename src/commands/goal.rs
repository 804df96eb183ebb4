//! Goal command handler.

use crate::args::GoalArgs;
use crate::commands::Out;
use crate::model::{Amount, Owner};
use crate::store::Mode;
use crate::{Config, Ledger, Result};

/// Shows the monthly net-income goal, or overwrites it when `--set` is given.
/// When no goal has ever been stored, the default is reported.
pub async fn goal(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: GoalArgs,
) -> Result<Out<Amount>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    match args.set() {
        Some(amount) => {
            ledger.set_goal(amount).await?;
            Ok(Out::new(format!("Goal set to {amount}"), amount))
        }
        None => {
            let current = ledger.goal().await?;
            Ok(Out::new(format!("Monthly goal is {current}"), current))
        }
    }
}
