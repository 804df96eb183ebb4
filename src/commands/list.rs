//! List command handler.

use crate::args::{EntityKind, ListArgs};
use crate::commands::Out;
use crate::model::{DepositEntry, MaintenanceEntry, Owner, Record, RevenueEntry};
use crate::store::Mode;
use crate::{Config, Ledger, Result};

/// Lists the caller's entries for one table, newest first, optionally
/// restricted to a YYYY-MM month. The structured output carries the full
/// entries; the message is one `describe()` line per entry.
pub async fn list(
    config: Config,
    owner: Owner,
    mode: Mode,
    args: ListArgs,
) -> Result<Out<Vec<serde_json::Value>>> {
    let mut ledger = Ledger::open(&config, owner, mode);
    match args.entity() {
        EntityKind::Revenue => list_entries::<RevenueEntry>(&mut ledger, &args).await,
        EntityKind::Deposit => list_entries::<DepositEntry>(&mut ledger, &args).await,
        EntityKind::Maintenance => list_entries::<MaintenanceEntry>(&mut ledger, &args).await,
    }
}

async fn list_entries<R: Record>(
    ledger: &mut Ledger,
    args: &ListArgs,
) -> Result<Out<Vec<serde_json::Value>>> {
    let mut entries: Vec<R> = ledger.load().await?;
    if let Some(month) = args.month() {
        entries.retain(|e| e.date().format("%Y-%m").to_string() == month);
    }
    entries.sort_by_key(|e| std::cmp::Reverse(e.date()));

    let message = if entries.is_empty() {
        format!("No {} entries found", R::TABLE)
    } else {
        entries
            .iter()
            .map(|e| e.describe())
            .collect::<Vec<String>>()
            .join("\n")
    };
    let structure = entries
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<serde_json::Value>, serde_json::Error>>()?;
    Ok(Out::new(message, structure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, DepositSource};
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_month_and_sorts_newest_first() {
        let env = TestEnv::new().await;
        let mut ledger = env.ledger();
        for (d, amount) in [
            ("2026-07-31", 1_000),
            ("2026-08-05", 2_000),
            ("2026-08-20", 3_000),
        ] {
            ledger
                .append(DepositEntry::new(
                    date(d),
                    DepositSource::Other,
                    Amount::new(amount),
                    "",
                ))
                .await
                .unwrap();
        }

        let args = ListArgs::new(EntityKind::Deposit, Some("2026-08".to_string()));
        let out = list(env.config(), env.owner(), Mode::Memory, args)
            .await
            .unwrap();
        let entries = out.structure().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["date"], "2026-08-20");
        assert_eq!(entries[1]["date"], "2026-08-05");
    }

    #[tokio::test]
    async fn test_list_empty_table() {
        let env = TestEnv::new().await;
        let args = ListArgs::new(EntityKind::Maintenance, None);
        let out = list(env.config(), env.owner(), Mode::Memory, args)
            .await
            .unwrap();
        assert!(out.message().contains("No maintenance entries"));
        assert!(out.structure().unwrap().is_empty());
    }
}
