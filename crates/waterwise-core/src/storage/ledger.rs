//! SQLite-backed usage ledger.
//!
//! The ledger is an append-only log of [`UsageRecord`]s. Row ids define the
//! log order; dates are stored as given, so duplicate or out-of-order days
//! are kept as-is.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{data_dir, migrations};
use crate::baseline::UsageSample;
use crate::error::{DatabaseError, Result};
use crate::numeric::round2;
use crate::record::UsageRecord;

const SELECT_COLUMNS: &str = "SELECT id, date, actual_usage, household_size, expected_usage,
            reward_score, efficiency_score, streak, recorded_at
     FROM usage_records";

/// Aggregates over the whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LedgerSummary {
    pub total_records: u64,
    pub total_liters: f64,
    pub average_usage: f64,
    pub total_reward: f64,
    pub days_under_baseline: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub average_efficiency: f64,
}

/// Append-only usage log.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// Open the ledger at `<data_dir>/waterwise.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the ledger
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("waterwise.db");
        Self::open_at(&path)
    }

    /// Open (or create) a ledger at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened ledger");
        Self::with_connection(conn)
    }

    /// Open an in-memory ledger.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Append a record and return its row id. The `id` field of `record`
    /// is ignored.
    pub fn append(&self, record: &UsageRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO usage_records
             (date, actual_usage, household_size, expected_usage, reward_score,
              efficiency_score, streak, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.date.format("%Y-%m-%d").to_string(),
                record.actual_usage,
                record.household_size,
                record.expected_usage,
                record.reward_score,
                record.efficiency_score,
                record.streak,
                record.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Every record, oldest first.
    pub fn records(&self) -> Result<Vec<UsageRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        self.query_records(&sql, [])
    }

    /// The last `limit` records, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<UsageRecord>> {
        let sql = format!(
            "SELECT * FROM ({SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1) ORDER BY id"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_records(&sql, [limit])
    }

    pub fn latest(&self) -> Result<Option<UsageRecord>> {
        Ok(self.recent(1)?.pop())
    }

    /// Estimator input: `(date, actual_usage)` for every record, oldest first.
    pub fn usage_history(&self) -> Result<Vec<UsageSample>> {
        Ok(self.records()?.iter().map(UsageRecord::sample).collect())
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM usage_records", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn summary(&self) -> Result<LedgerSummary> {
        let records = self.records()?;
        Ok(summarize(&records))
    }

    fn query_records<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<UsageRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt
            .query_map(params, RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(RawRecord::decode).collect()
    }
}

/// Row as stored, before date parsing.
struct RawRecord {
    id: i64,
    date: String,
    actual_usage: f64,
    household_size: u32,
    expected_usage: f64,
    reward_score: f64,
    efficiency_score: f64,
    streak: u32,
    recorded_at: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            actual_usage: row.get(2)?,
            household_size: row.get(3)?,
            expected_usage: row.get(4)?,
            reward_score: row.get(5)?,
            efficiency_score: row.get(6)?,
            streak: row.get(7)?,
            recorded_at: row.get(8)?,
        })
    }

    fn decode(self) -> Result<UsageRecord> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            id: self.id,
            message,
        };
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| corrupt(format!("date '{}': {e}", self.date)))?;
        let recorded_at = DateTime::parse_from_rfc3339(&self.recorded_at)
            .map_err(|e| corrupt(format!("recorded_at '{}': {e}", self.recorded_at)))?
            .with_timezone(&Utc);

        Ok(UsageRecord {
            id: self.id,
            date,
            actual_usage: self.actual_usage,
            household_size: self.household_size,
            expected_usage: self.expected_usage,
            reward_score: self.reward_score,
            efficiency_score: self.efficiency_score,
            streak: self.streak,
            recorded_at,
        })
    }
}

fn summarize(records: &[UsageRecord]) -> LedgerSummary {
    if records.is_empty() {
        return LedgerSummary::default();
    }

    let n = records.len() as f64;
    let total_liters: f64 = records.iter().map(|r| r.actual_usage).sum();
    let total_reward: f64 = records.iter().map(|r| r.reward_score).sum();
    let total_efficiency: f64 = records.iter().map(|r| r.efficiency_score).sum();

    LedgerSummary {
        total_records: records.len() as u64,
        total_liters: round2(total_liters),
        average_usage: round2(total_liters / n),
        total_reward: round2(total_reward),
        days_under_baseline: records.iter().filter(|r| r.earned_reward()).count() as u64,
        current_streak: records.last().map_or(0, |r| r.streak),
        best_streak: records.iter().map(|r| r.streak).max().unwrap_or(0),
        average_efficiency: round2(total_efficiency / n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, actual: f64, expected: f64, reward: f64, streak: u32) -> UsageRecord {
        UsageRecord {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            actual_usage: actual,
            household_size: 2,
            expected_usage: expected,
            reward_score: reward,
            efficiency_score: crate::analysis::efficiency_score(actual, expected),
            streak,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn append_and_read_back_in_order() {
        let ledger = Ledger::open_memory().unwrap();
        let first = ledger.append(&record(2, 100.0, 0.0, 0.0, 0)).unwrap();
        let second = ledger.append(&record(1, 80.0, 100.0, 0.2, 1)).unwrap();
        assert!(second > first);

        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 2);
        // insertion order wins over date order
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(records[1].reward_score, 0.2);
        assert_eq!(records[1].id, second);
    }

    #[test]
    fn duplicate_dates_are_kept() {
        let ledger = Ledger::open_memory().unwrap();
        ledger.append(&record(5, 100.0, 0.0, 0.0, 0)).unwrap();
        ledger.append(&record(5, 120.0, 100.0, 0.0, 0)).unwrap();
        assert_eq!(ledger.count().unwrap(), 2);
    }

    #[test]
    fn recent_returns_tail_oldest_first() {
        let ledger = Ledger::open_memory().unwrap();
        for day in 1..=5 {
            ledger.append(&record(day, f64::from(day) * 10.0, 0.0, 0.0, 0)).unwrap();
        }
        let recent = ledger.recent(2).unwrap();
        let usage: Vec<f64> = recent.iter().map(|r| r.actual_usage).collect();
        assert_eq!(usage, vec![40.0, 50.0]);
        assert_eq!(ledger.latest().unwrap().unwrap().actual_usage, 50.0);
    }

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::open_memory().unwrap();
        assert!(ledger.latest().unwrap().is_none());
        assert!(ledger.usage_history().unwrap().is_empty());
        assert_eq!(ledger.summary().unwrap(), LedgerSummary::default());
    }

    #[test]
    fn summary_aggregates() {
        let ledger = Ledger::open_memory().unwrap();
        ledger.append(&record(1, 100.0, 0.0, 0.0, 0)).unwrap();
        ledger.append(&record(2, 80.0, 100.0, 0.2, 1)).unwrap();
        ledger.append(&record(3, 60.0, 90.0, 0.3, 2)).unwrap();
        ledger.append(&record(4, 200.0, 80.0, 0.0, 0)).unwrap();

        let summary = ledger.summary().unwrap();
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.total_liters, 440.0);
        assert_eq!(summary.average_usage, 110.0);
        assert_eq!(summary.total_reward, 0.5);
        assert_eq!(summary.days_under_baseline, 2);
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.best_streak, 2);
    }

    #[test]
    fn open_at_persists_between_handles() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let ledger = Ledger::open_at(&path).unwrap();
            ledger.append(&record(1, 90.0, 0.0, 0.0, 0)).unwrap();
        }
        let reopened = Ledger::open_at(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
