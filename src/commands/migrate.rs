//! Migrate command handler.

use crate::commands::Out;
use crate::model::{DepositEntry, MaintenanceEntry, Owner, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};
use serde::Serialize;

/// Per-table row counts from a migration run. Zero means the table was
/// already on the current schema (or empty).
#[derive(Debug, Clone, Serialize)]
pub struct Migrated {
    revenue: usize,
    deposits: usize,
    maintenance: usize,
}

/// Upgrades every legacy table to the current schema. Each legacy row gets a
/// minted entry id and the caller's identity; the caller adopts the whole
/// table into their partition.
pub async fn migrate(config: Config, owner: Owner, mode: Mode) -> Result<Out<Migrated>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    let counts = Migrated {
        revenue: ledger.migrate::<RevenueEntry>().await?,
        deposits: ledger.migrate::<DepositEntry>().await?,
        maintenance: ledger.migrate::<MaintenanceEntry>().await?,
    };
    let total = counts.revenue + counts.deposits + counts.maintenance;
    let message = if total == 0 {
        "All tables are already on the current schema".to_string()
    } else {
        format!(
            "Migrated {total} row{} (revenue {}, deposits {}, maintenance {})",
            if total == 1 { "" } else { "s" },
            counts.revenue,
            counts.deposits,
            counts.maintenance
        )
    };
    Ok(Out::new(message, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Table};
    use crate::store::mem::{MemState, MemStore};
    use crate::test::TestEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_migrate_adopts_legacy_rows() {
        let env = TestEnv::new().await;
        let mut tables = HashMap::new();
        tables.insert(
            Table::Deposits,
            vec![
                Table::Deposits
                    .legacy_headers()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                vec!["2026-08-01", "coupang", "10000", "old row"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ],
        );
        MemStore::set_state(&env.mem_key(), MemState { tables, goal: None });

        let out = migrate(env.config(), env.owner(), Mode::Memory)
            .await
            .unwrap();
        assert!(out.message().contains("deposits 1"));

        let mut ledger = env.ledger();
        let entries: Vec<DepositEntry> = ledger.load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].entry_id().is_empty());

        // A second run has nothing to do.
        let out = migrate(env.config(), env.owner(), Mode::Memory)
            .await
            .unwrap();
        assert!(out.message().contains("already on the current schema"));
    }
}
