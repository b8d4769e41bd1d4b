use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum AlertLogError {
    #[error("failed to create alert log directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to append to alert log {path}: {source}")]
    Append {
        path: String,
        source: std::io::Error,
    },
}

/// Append-only text log of dispatched alerts, one line per dispatch:
/// `<YYYY-MM-DD HH:MM:SS> - ALERT: <subject>`. Only ever read back by the
/// daily report, which filters lines by date prefix.
pub struct AlertLog {
    path: PathBuf,
}

impl AlertLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, now: DateTime<Utc>, subject: &str) -> Result<(), AlertLogError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| AlertLogError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let append_error = |source| AlertLogError::Append {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_error)?;

        writeln!(
            file,
            "{} - ALERT: {}",
            now.format(TIMESTAMP_FORMAT),
            subject
        )
        .map_err(append_error)
    }

    /// Best effort: an unreadable or absent log yields an empty history, not
    /// an error.
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<String> {
        let prefix = date.format(DATE_FORMAT).to_string();
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents
                .lines()
                .filter(|line| line.starts_with(&prefix))
                .map(|line| line.to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn log_in(dir: &tempfile::TempDir) -> AlertLog {
        AlertLog::new(dir.path().join("nested").join("alerts.log"))
    }

    #[test]
    fn appends_one_parseable_line_per_dispatch() {
        let temp = tempfile::tempdir().expect("temp dir");
        let log = log_in(&temp);
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap();

        log.append(now, "High load average: 16").expect("append");
        log.append(now, "Daily server report - web1").expect("append");

        let contents =
            std::fs::read_to_string(temp.path().join("nested").join("alerts.log")).expect("read");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2024-03-09 14:30:05 - ALERT: High load average: 16");

        for line in lines {
            let (timestamp, subject) = line.split_once(" - ALERT: ").expect("line shape");
            assert!(
                chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok()
            );
            assert!(!subject.is_empty());
        }
    }

    #[test]
    fn entries_for_date_filters_by_day() {
        let temp = tempfile::tempdir().expect("temp dir");
        let log = log_in(&temp);

        let yesterday = Utc.with_ymd_and_hms(2024, 3, 8, 23, 59, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 3, 9, 0, 1, 0).unwrap();
        log.append(yesterday, "old alert").expect("append");
        log.append(today, "fresh alert").expect("append");

        let entries = log.entries_for_date(today.date_naive());
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("fresh alert"));
    }

    #[test]
    fn missing_log_yields_empty_history() {
        let temp = tempfile::tempdir().expect("temp dir");
        let log = log_in(&temp);
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap().date_naive();
        assert!(log.entries_for_date(date).is_empty());
    }
}
