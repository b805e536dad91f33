//! Prompt-submit hook: list alerts that have come due so the assistant sees
//! them in its context. Prints nothing when none are due.

use chrono::NaiveDateTime;

use crate::alerts::{Alert, AlertDb};
use crate::error::Result;

pub fn check(db: &AlertDb, now: NaiveDateTime) -> Result<Option<String>> {
    Ok(render(&db.due(now)?))
}

pub fn render(due: &[Alert]) -> Option<String> {
    if due.is_empty() {
        return None;
    }
    let mut out = String::from("⏰ ALERTS DUE:\n");
    for alert in due {
        out.push_str(&format!(
            "  [{}] {}: {}\n",
            alert.id,
            alert.due_display(),
            alert.message
        ));
    }
    out.push_str("(Use 'dotclaude alert ack <id>' to dismiss)");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn nothing_due_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let db = AlertDb::open(&dir.path().join("alerts.redb")).unwrap();
        db.add(at("2026-05-01 12:00"), "later").unwrap();
        assert_eq!(check(&db, at("2026-05-01 11:59")).unwrap(), None);
    }

    #[test]
    fn due_alerts_are_listed_with_hint() {
        let dir = TempDir::new().unwrap();
        let db = AlertDb::open(&dir.path().join("alerts.redb")).unwrap();
        db.add(at("2026-05-01 09:30"), "standup").unwrap();
        db.add(at("2026-05-01 09:00"), "coffee").unwrap();

        let text = check(&db, at("2026-05-01 10:00")).unwrap().unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "⏰ ALERTS DUE:");
        assert_eq!(lines[1], "  [2] 2026-05-01 09:00: coffee");
        assert_eq!(lines[2], "  [1] 2026-05-01 09:30: standup");
        assert!(lines[3].contains("dotclaude alert ack"));
    }
}
