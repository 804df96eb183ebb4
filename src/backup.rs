//! Rotated table snapshots taken before destructive writes.
//!
//! `replace_all` is the only mutation primitive the CSV backend has, and a bad
//! replace destroys every row in the table. Before each rewrite the previous
//! file is copied into the backups directory under a dated, sequenced name,
//! and old copies beyond the configured count are pruned.

use crate::{utils, Result};
use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Takes and rotates table snapshots. Immutable; holds copies of the paths
/// and settings it needs.
#[derive(Debug, Clone)]
pub(crate) struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub(crate) fn new(backups_dir: impl Into<PathBuf>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            backup_copies,
        }
    }

    /// Copies `file` into the backups directory as
    /// `{prefix}.YYYY-MM-DD-NNN.csv`, then prunes snapshots with the same
    /// prefix down to `backup_copies`. Returns the snapshot path.
    pub(crate) async fn snapshot(&self, file: &Path, prefix: &str) -> Result<PathBuf> {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let seq = self.next_sequence(prefix, &date).await?;
        let path = self
            .backups_dir
            .join(format!("{prefix}.{date}-{seq:03}.csv"));
        utils::copy(file, &path).await?;
        self.prune(prefix).await?;
        Ok(path)
    }

    /// Next unused sequence number for `prefix` on `date`.
    async fn next_sequence(&self, prefix: &str, date: &str) -> Result<u32> {
        let mut max_seq = 0u32;
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read backups directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(seq) = parse_sequence(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Deletes the oldest snapshots for `prefix` beyond `backup_copies`.
    /// Filename order is age order because of the date-sequence naming.
    async fn prune(&self, prefix: &str) -> Result<()> {
        let match_start = format!("{prefix}.");
        let mut names: Vec<String> = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read backups directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&match_start) && name.ends_with(".csv") {
                names.push(name);
            }
        }
        names.sort();
        let excess = names.len().saturating_sub(self.backup_copies as usize);
        for name in names.into_iter().take(excess) {
            utils::remove(self.backups_dir.join(name)).await?;
        }
        Ok(())
    }
}

/// Parses the sequence number out of `{prefix}.{date}-{NNN}.csv`. `None` when
/// the name does not match.
fn parse_sequence(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_sequence() {
        assert_eq!(
            parse_sequence("revenue.2026-08-28-001.csv", "revenue", "2026-08-28"),
            Some(1)
        );
        assert_eq!(
            parse_sequence("revenue.2026-08-28-042.csv", "revenue", "2026-08-28"),
            Some(42)
        );
        // Wrong prefix.
        assert_eq!(
            parse_sequence("deposits.2026-08-28-001.csv", "revenue", "2026-08-28"),
            None
        );
        // Wrong date.
        assert_eq!(
            parse_sequence("revenue.2026-08-27-001.csv", "revenue", "2026-08-28"),
            None
        );
        // Not a snapshot file.
        assert_eq!(parse_sequence("revenue.csv", "revenue", "2026-08-28"), None);
    }

    #[tokio::test]
    async fn test_snapshot_and_prune() {
        let dir = TempDir::new().unwrap();
        let backups = dir.path().join("backups");
        tokio::fs::create_dir(&backups).await.unwrap();
        let source = dir.path().join("revenue.csv");
        tokio::fs::write(&source, "a,b,c\n").await.unwrap();

        let backup = Backup::new(&backups, 2);
        let first = backup.snapshot(&source, "revenue").await.unwrap();
        assert!(first.is_file());
        let content = tokio::fs::read_to_string(&first).await.unwrap();
        assert_eq!(content, "a,b,c\n");

        backup.snapshot(&source, "revenue").await.unwrap();
        backup.snapshot(&source, "revenue").await.unwrap();

        // Only backup_copies snapshots survive, and the oldest was pruned.
        let mut names: Vec<String> = std::fs::read_dir(&backups)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(!first.is_file());
    }
}
