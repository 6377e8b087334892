//! Date-stamped Append Logs
//!
//! Plain-text files named `<prefix>_<YYYY-MM-DD>.txt`, one per calendar day
//! (local time). Used for the raw webhook audit trail and for upsert failures.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Append-only log rotated by calendar day
#[derive(Clone, Debug)]
pub struct DailyLog {
    dir: PathBuf,
    prefix: String,
}

impl DailyLog {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that receives lines written on `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.txt", self.prefix, date.format("%Y-%m-%d")))
    }

    /// File that receives lines written today
    pub fn today_path(&self) -> PathBuf {
        self.path_for(Local::now().date_naive())
    }

    /// Append one line to today's file, creating the directory if needed
    pub async fn append(&self, line: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.today_path();
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }

    /// Append, reporting failures through tracing instead of returning them
    pub async fn record(&self, line: &str) {
        if let Err(e) = self.append(line).await {
            tracing::warn!(
                error = %e,
                prefix = %self.prefix,
                dir = %self.dir.display(),
                "Failed to write daily log"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tagbridge-log-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_name_is_date_stamped() {
        let log = DailyLog::new("/var/log/tagbridge", "webhook");
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            log.path_for(date),
            PathBuf::from("/var/log/tagbridge/webhook_2026-03-07.txt")
        );
    }

    #[tokio::test]
    async fn test_append_adds_lines() {
        let dir = temp_dir();
        let log = DailyLog::new(&dir, "webhook");

        log.append("first").await.unwrap();
        log.record("second").await;

        let contents = std::fs::read_to_string(log.today_path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
