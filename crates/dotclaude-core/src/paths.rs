use crate::error::{DotclaudeError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "dotclaude.yaml";
pub const DEFAULT_SOURCE_DIR: &str = "claude";
pub const DEFAULT_TARGET_DIR: &str = "~/.claude";
pub const DEFAULT_AFK_FLAG: &str = "/tmp/claude-afk";
pub const ALERTS_DB: &str = "alerts.redb";

/// Infix between a target name and its timestamp in backup file names.
pub const BACKUP_INFIX: &str = ".backup.";
/// `chrono` format of the timestamp in backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn alerts_db_path(target_dir: &Path) -> PathBuf {
    target_dir.join(ALERTS_DB)
}

/// `<target>.backup.<stamp>`, kept in the target's own directory.
pub fn backup_path(target: &Path, stamp: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_INFIX);
    name.push(stamp);
    target.with_file_name(name)
}

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return home::home_dir().ok_or(DotclaudeError::HomeNotFound);
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = home::home_dir().ok_or(DotclaudeError::HomeNotFound)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve `raw` against `root` unless it is already absolute (after `~` expansion).
pub fn resolve_against(root: &Path, raw: &str) -> Result<PathBuf> {
    let p = expand_tilde(raw)?;
    if p.is_absolute() {
        Ok(p)
    } else {
        Ok(root.join(p))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
