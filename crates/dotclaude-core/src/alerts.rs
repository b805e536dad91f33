//! Timed reminders surfaced by the `alerts` hook.
//!
//! # Table design
//!
//! `ALERTS` uses a 16-byte composite key:
//! ```text
//! [ due_ms: sign-flipped i64 big-endian (8 bytes) | id: u64 big-endian (8 bytes) ]
//! ```
//! Byte order equals due-time order, so [`AlertDb::due`] is a single range
//! scan `..=due_upper_bound(now)` filtered only on `acknowledged`.
//!
//! `META` holds the next alert id so ids stay sequential from 1 across runs.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Timelike, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DotclaudeError, Result};
use crate::io;

/// Key: 16-byte composite (due_ms big-endian ++ id big-endian)
/// Value: JSON-encoded Alert
const ALERTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("alerts");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");
const NEXT_ID: &str = "next_id";

/// Display and `YYYY-MM-DD HH:MM` input format of due times.
pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    /// Local wall-clock time, minute precision.
    pub due_at: NaiveDateTime,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
}

impl Alert {
    pub fn due_display(&self) -> String {
        self.due_at.format(DUE_FORMAT).to_string()
    }
}

// ---------------------------------------------------------------------------
// Time parsing
// ---------------------------------------------------------------------------

static RELATIVE_RE: OnceLock<Regex> = OnceLock::new();

fn relative_re() -> &'static Regex {
    RELATIVE_RE.get_or_init(|| Regex::new(r"^\+(\d+)([mh])$").unwrap())
}

/// Parse a due time relative to `now`.
///
/// Accepts `HH:MM` (today), `YYYY-MM-DD HH:MM`, `+Nm` and `+Nh`.
/// Results are truncated to the minute.
pub fn parse_due(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let text = text.trim();
    let invalid = || DotclaudeError::InvalidAlertTime(text.to_string());

    let parsed = if let Some(caps) = relative_re().captures(text) {
        let amount: i64 = caps[1].parse().map_err(|_| invalid())?;
        let delta = match &caps[2] {
            "m" => Duration::try_minutes(amount),
            _ => Duration::try_hours(amount),
        }
        .ok_or_else(invalid)?;
        now.checked_add_signed(delta).ok_or_else(invalid)?
    } else if text.len() == 5 {
        let time = NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| invalid())?;
        now.date().and_time(time)
    } else {
        NaiveDateTime::parse_from_str(text, DUE_FORMAT).map_err(|_| invalid())?
    };

    Ok(truncate_to_minute(parsed))
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

/// Epoch millis with the sign bit flipped, so unsigned byte order matches
/// time order on both sides of 1970.
fn due_ms(due_at: NaiveDateTime) -> u64 {
    (due_at.and_utc().timestamp_millis() as u64) ^ (1 << 63)
}

fn alert_key(due_at: NaiveDateTime, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&due_ms(due_at).to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

/// Upper bound for a range scan returning every alert due by `now`.
fn due_upper_bound(now: NaiveDateTime) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&due_ms(now).to_be_bytes());
    key[8..].fill(0xff);
    key
}

fn db_err(e: impl std::fmt::Display) -> DotclaudeError {
    DotclaudeError::AlertDb(e.to_string())
}

// ---------------------------------------------------------------------------
// AlertDb
// ---------------------------------------------------------------------------

pub struct AlertDb {
    db: Database,
}

impl AlertDb {
    /// Open or create the database at `path`, creating its tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(ALERTS).map_err(db_err)?;
        wt.open_table(META).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    /// Queue a new alert and return it with its assigned id.
    pub fn add(&self, due_at: NaiveDateTime, message: impl Into<String>) -> Result<Alert> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let alert = {
            let mut meta = wt.open_table(META).map_err(db_err)?;
            let id = meta
                .get(NEXT_ID)
                .map_err(db_err)?
                .map(|g| g.value())
                .unwrap_or(1);
            meta.insert(NEXT_ID, id + 1).map_err(db_err)?;

            let alert = Alert {
                id,
                due_at,
                message: message.into(),
                created_at: Utc::now(),
                acknowledged: false,
            };
            let value = serde_json::to_vec(&alert)?;
            let mut table = wt.open_table(ALERTS).map_err(db_err)?;
            table
                .insert(alert_key(due_at, id).as_slice(), value.as_slice())
                .map_err(db_err)?;
            alert
        };
        wt.commit().map_err(db_err)?;
        Ok(alert)
    }

    /// Unacknowledged alerts with `due_at <= now`, earliest first.
    pub fn due(&self, now: NaiveDateTime) -> Result<Vec<Alert>> {
        let upper = due_upper_bound(now);
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ALERTS).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table.range(..=upper.as_slice()).map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            let alert: Alert = serde_json::from_slice(v.value())?;
            if !alert.acknowledged {
                result.push(alert);
            }
        }
        Ok(result)
    }

    /// Every alert, earliest due first.
    pub fn list_all(&self) -> Result<Vec<Alert>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ALERTS).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    /// Unacknowledged alerts, due or not.
    pub fn list_pending(&self) -> Result<Vec<Alert>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|a| !a.acknowledged)
            .collect())
    }

    /// Mark an alert acknowledged so it is no longer reported as due.
    pub fn ack(&self, id: u64) -> Result<Alert> {
        let mut alert = self
            .list_all()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(DotclaudeError::AlertNotFound(id))?;
        alert.acknowledged = true;

        let value = serde_json::to_vec(&alert)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(ALERTS).map_err(db_err)?;
            table
                .insert(alert_key(alert.due_at, alert.id).as_slice(), value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(alert)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn open_tmp() -> (TempDir, AlertDb) {
        let dir = TempDir::new().unwrap();
        let db = AlertDb::open(&dir.path().join("nested/alerts.redb")).unwrap();
        (dir, db)
    }

    #[test]
    fn parse_relative_minutes_and_hours() {
        let now = at("2026-05-01 10:15:42");
        assert_eq!(parse_due("+30m", now).unwrap(), at("2026-05-01 10:45:00"));
        assert_eq!(parse_due("+2h", now).unwrap(), at("2026-05-01 12:15:00"));
        assert_eq!(parse_due("+20h", now).unwrap(), at("2026-05-02 06:15:00"));
    }

    #[test]
    fn parse_clock_time_is_today() {
        let now = at("2026-05-01 10:15:42");
        assert_eq!(parse_due("09:05", now).unwrap(), at("2026-05-01 09:05:00"));
    }

    #[test]
    fn parse_full_datetime() {
        let now = at("2026-05-01 10:15:42");
        assert_eq!(
            parse_due("2026-12-24 18:00", now).unwrap(),
            at("2026-12-24 18:00:00")
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        let now = at("2026-05-01 10:15:42");
        for bad in ["", "+5d", "+m", "25:00", "tomorrow", "2026-13-01 10:00"] {
            let err = parse_due(bad, now).unwrap_err();
            assert!(
                matches!(err, DotclaudeError::InvalidAlertTime(_)),
                "expected invalid: {bad}"
            );
        }
    }

    #[test]
    fn ids_are_sequential_and_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.redb");
        {
            let db = AlertDb::open(&path).unwrap();
            assert_eq!(db.add(at("2026-05-01 10:00:00"), "one").unwrap().id, 1);
            assert_eq!(db.add(at("2026-05-01 09:00:00"), "two").unwrap().id, 2);
        }
        let db = AlertDb::open(&path).unwrap();
        assert_eq!(db.add(at("2026-05-01 11:00:00"), "three").unwrap().id, 3);
        assert_eq!(db.list_all().unwrap().len(), 3);
    }

    #[test]
    fn due_returns_only_past_in_time_order() {
        let (_dir, db) = open_tmp();
        db.add(at("2026-05-01 10:30:00"), "later").unwrap();
        db.add(at("2026-05-01 09:00:00"), "early").unwrap();
        db.add(at("2026-05-01 12:00:00"), "future").unwrap();

        let due = db.due(at("2026-05-01 10:30:00")).unwrap();
        let messages: Vec<_> = due.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, ["early", "later"]);
    }

    #[test]
    fn ack_hides_alert_from_due() {
        let (_dir, db) = open_tmp();
        let a = db.add(at("2026-05-01 09:00:00"), "stretch").unwrap();
        let acked = db.ack(a.id).unwrap();
        assert!(acked.acknowledged);

        assert!(db.due(at("2026-05-01 10:00:00")).unwrap().is_empty());
        assert!(db.list_pending().unwrap().is_empty());
        assert_eq!(db.list_all().unwrap().len(), 1);
    }

    #[test]
    fn ack_missing_returns_not_found() {
        let (_dir, db) = open_tmp();
        let err = db.ack(99).unwrap_err();
        assert!(matches!(err, DotclaudeError::AlertNotFound(99)));
    }

    #[test]
    fn empty_db_has_nothing_due() {
        let (_dir, db) = open_tmp();
        assert!(db.due(at("2030-01-01 00:00:00")).unwrap().is_empty());
    }

    #[test]
    fn pre_epoch_alerts_keep_time_order() {
        let (_dir, db) = open_tmp();
        db.add(at("1969-12-31 23:00:00"), "late sixties").unwrap();
        db.add(at("1960-01-01 08:00:00"), "early sixties").unwrap();
        db.add(at("1970-01-01 00:30:00"), "after epoch").unwrap();

        let due: Vec<_> = db
            .due(at("1970-01-01 00:00:00"))
            .unwrap()
            .into_iter()
            .map(|a| a.message)
            .collect();
        assert_eq!(due, ["early sixties", "late sixties"]);

        let all: Vec<_> = db.list_all().unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(all, [2, 1, 3]);
    }

    #[test]
    fn due_display_is_minute_precision() {
        let (_dir, db) = open_tmp();
        let a = db.add(at("2026-05-01 09:05:00"), "x").unwrap();
        assert_eq!(a.due_display(), "2026-05-01 09:05");
    }
}
