//! Tabular/dated store (C6, §4.8): raw candidates, scored candidates, and
//! watchlist entries keyed by `(date, ecosystem, name)`, backed by SQLite.
//!
//! Writes are idempotent per date: a second `insert` for the same date
//! replaces that date's rows atomically, inside one transaction.

use crate::error::{PersistenceErrorKind, PhantomScanError, Result};
use crate::model::{Ecosystem, PackageCandidate, ScoreBreakdown, ScoredCandidate, WatchlistEntry};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;
use std::str::FromStr;

/// A handle to the SQLite-backed tabular store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if necessary) the store at `path`, running schema
    /// migrations idempotently.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PhantomScanError::io(parent, e))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS raw_candidates (
                date TEXT NOT NULL,
                ecosystem TEXT NOT NULL,
                name TEXT NOT NULL,
                json TEXT NOT NULL,
                PRIMARY KEY (date, ecosystem, name)
            );
            CREATE TABLE IF NOT EXISTS scored_candidates (
                date TEXT NOT NULL,
                ecosystem TEXT NOT NULL,
                name TEXT NOT NULL,
                total REAL NOT NULL,
                json TEXT NOT NULL,
                PRIMARY KEY (date, ecosystem, name)
            );
            CREATE TABLE IF NOT EXISTS watchlist (
                date TEXT NOT NULL,
                ecosystem TEXT NOT NULL,
                name TEXT NOT NULL,
                not_found_reason TEXT NOT NULL,
                first_seen_at TEXT NOT NULL,
                PRIMARY KEY (date, ecosystem, name)
            );",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE raw_candidates (date TEXT, ecosystem TEXT, name TEXT, json TEXT, PRIMARY KEY (date, ecosystem, name));
             CREATE TABLE scored_candidates (date TEXT, ecosystem TEXT, name TEXT, total REAL, json TEXT, PRIMARY KEY (date, ecosystem, name));
             CREATE TABLE watchlist (date TEXT, ecosystem TEXT, name TEXT, not_found_reason TEXT, first_seen_at TEXT, PRIMARY KEY (date, ecosystem, name));",
        )?;
        Ok(Self { conn })
    }

    /// Replace the raw candidates for `(date, ecosystem)` atomically.
    pub fn insert_raw_candidates(
        &mut self,
        date: NaiveDate,
        ecosystem: Ecosystem,
        candidates: &[PackageCandidate],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM raw_candidates WHERE date = ?1 AND ecosystem = ?2",
            params![date.to_string(), ecosystem.as_str()],
        )?;
        for candidate in candidates {
            let json = serde_json::to_string(candidate)
                .map_err(|e| serialize_error(e.to_string()))?;
            tx.execute(
                "INSERT INTO raw_candidates (date, ecosystem, name, json) VALUES (?1, ?2, ?3, ?4)",
                params![date.to_string(), ecosystem.as_str(), candidate.name, json],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Replace every scored candidate for `date` atomically, across all
    /// ecosystems (a full day's run is one unit).
    pub fn insert_scored(&mut self, date: NaiveDate, scored: &[ScoredCandidate]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM scored_candidates WHERE date = ?1",
            params![date.to_string()],
        )?;
        for item in scored {
            let json = serde_json::to_string(item).map_err(|e| serialize_error(e.to_string()))?;
            tx.execute(
                "INSERT INTO scored_candidates (date, ecosystem, name, total, json) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    date.to_string(),
                    item.candidate.ecosystem.as_str(),
                    item.candidate.name,
                    item.total,
                    json
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Replace the watchlist for `date` atomically.
    pub fn insert_watchlist(&mut self, date: NaiveDate, entries: &[WatchlistEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM watchlist WHERE date = ?1",
            params![date.to_string()],
        )?;
        for entry in entries {
            tx.execute(
                "INSERT INTO watchlist (date, ecosystem, name, not_found_reason, first_seen_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    date.to_string(),
                    entry.ecosystem.as_str(),
                    entry.name,
                    entry.not_found_reason,
                    entry.first_seen_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// All raw candidates previously fetched for `(date, ecosystem)`.
    pub fn get_raw_candidates(
        &self,
        date: NaiveDate,
        ecosystem: Ecosystem,
    ) -> Result<Vec<PackageCandidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT json FROM raw_candidates WHERE date = ?1 AND ecosystem = ?2",
        )?;
        let rows = stmt.query_map(
            params![date.to_string(), ecosystem.as_str()],
            |row| row.get::<_, String>(0),
        )?;
        let mut out = Vec::new();
        for row in rows {
            let json = row?;
            let candidate: PackageCandidate =
                serde_json::from_str(&json).map_err(|e| serialize_error(e.to_string()))?;
            out.push(candidate);
        }
        Ok(out)
    }

    /// All scored rows for `date`, ordered by `total` descending (§4.8).
    pub fn get_scored_candidates(&self, date: NaiveDate) -> Result<Vec<ScoredCandidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT json FROM scored_candidates WHERE date = ?1 ORDER BY total DESC",
        )?;
        let rows = stmt.query_map(params![date.to_string()], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let json = row?;
            let item: ScoredCandidate =
                serde_json::from_str(&json).map_err(|e| serialize_error(e.to_string()))?;
            out.push(item);
        }
        Ok(out)
    }

    /// All watchlist rows for `date`.
    pub fn get_watchlist(&self, date: NaiveDate) -> Result<Vec<WatchlistEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT ecosystem, name, not_found_reason, first_seen_at FROM watchlist WHERE date = ?1",
        )?;
        let rows = stmt.query_map(params![date.to_string()], |row| {
            let ecosystem: String = row.get(0)?;
            let name: String = row.get(1)?;
            let not_found_reason: String = row.get(2)?;
            let first_seen_at: String = row.get(3)?;
            Ok((ecosystem, name, not_found_reason, first_seen_at))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (ecosystem, name, not_found_reason, first_seen_at) = row?;
            let ecosystem = Ecosystem::from_str(&ecosystem)
                .map_err(|e| serialize_error(e))?;
            let first_seen_at = chrono::DateTime::parse_from_rfc3339(&first_seen_at)
                .map_err(|e| serialize_error(e.to_string()))?
                .with_timezone(&chrono::Utc);
            out.push(WatchlistEntry {
                ecosystem,
                name,
                not_found_reason,
                first_seen_at,
            });
        }
        Ok(out)
    }

    /// Every date with at least one scored row, ascending.
    pub fn get_all_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT date FROM scored_candidates ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let date = NaiveDate::parse_from_str(&row?, "%Y-%m-%d")
                .map_err(|e| serialize_error(e.to_string()))?;
            out.push(date);
        }
        Ok(out)
    }

    /// Delete every row dated strictly before `cutoff` across all tables.
    pub fn delete_older_than(&mut self, cutoff: NaiveDate) -> Result<()> {
        let tx = self.conn.transaction()?;
        for table in ["raw_candidates", "scored_candidates", "watchlist"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE date < ?1"),
                params![cutoff.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn serialize_error(message: impl Into<String>) -> PhantomScanError {
    PhantomScanError::persistence(
        "serializing persisted record",
        PersistenceErrorKind::Serialize(message.into()),
    )
}
