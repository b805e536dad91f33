//! Symlink management for the config bundle.
//!
//! Each [`LinkSpec`] maps one entry of the bundle's source tree onto the same
//! name in the target directory. [`install`] makes every target a symlink to its
//! source, moving anything already there aside as `<target>.backup.<stamp>`
//! once the caller's [`Confirm`] agrees. [`uninstall`] removes only symlinks.
//!
//! Specs are processed independently: a failure on one is recorded in its
//! [`LinkReport`] and the rest still run.

use crate::error::{DotclaudeError, Result};
use crate::io;
use crate::paths;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Dir,
    File,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Dir => f.write_str("dir"),
            LinkKind::File => f.write_str("file"),
        }
    }
}

impl std::str::FromStr for LinkKind {
    type Err = DotclaudeError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dir" => Ok(LinkKind::Dir),
            "file" => Ok(LinkKind::File),
            _ => Err(DotclaudeError::InvalidLinkKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSpec {
    pub name: String,
    pub kind: LinkKind,
    pub source: PathBuf,
    pub target: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LinkAction {
    Linked,
    AlreadyLinked,
    Replaced { backup: PathBuf },
    Skipped,
    Removed,
    NotALink,
    NotFound,
    Failed { error: String },
}

impl LinkAction {
    pub fn is_failure(&self) -> bool {
        matches!(self, LinkAction::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub name: String,
    pub target: PathBuf,
    #[serde(flatten)]
    pub action: LinkAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Symlink pointing at the source.
    Linked,
    /// Symlink pointing somewhere else (or dangling).
    WrongTarget,
    /// A real file or directory occupies the target.
    Conflict,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkStatus {
    pub name: String,
    pub kind: LinkKind,
    pub source: PathBuf,
    pub target: PathBuf,
    pub source_exists: bool,
    pub state: LinkState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_to: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Confirm
// ---------------------------------------------------------------------------

/// Asked before an existing target is backed up and replaced.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

// ---------------------------------------------------------------------------
// Install
// ---------------------------------------------------------------------------

/// Link every entry, in order. `now` stamps any backups made during this run.
pub fn install(
    specs: &[LinkSpec],
    confirm: &mut dyn Confirm,
    now: DateTime<Local>,
) -> Vec<LinkReport> {
    let stamp = now.format(paths::BACKUP_TIMESTAMP_FORMAT).to_string();
    specs
        .iter()
        .map(|spec| {
            let action = install_one(spec, confirm, &stamp).unwrap_or_else(|e| {
                tracing::warn!(name = %spec.name, "install failed: {e}");
                LinkAction::Failed {
                    error: e.to_string(),
                }
            });
            LinkReport {
                name: spec.name.clone(),
                target: spec.target.clone(),
                action,
            }
        })
        .collect()
}

fn install_one(spec: &LinkSpec, confirm: &mut dyn Confirm, stamp: &str) -> Result<LinkAction> {
    if !spec.source.exists() {
        return Err(DotclaudeError::SourceMissing(
            spec.source.display().to_string(),
        ));
    }

    if io::links_to(&spec.target, &spec.source) {
        return Ok(LinkAction::AlreadyLinked);
    }

    let is_dir = spec.kind == LinkKind::Dir;

    if io::path_occupied(&spec.target) {
        let prompt = format!(
            "{} already exists. Back it up and replace it with a link?",
            spec.target.display()
        );
        if !confirm.confirm(&prompt) {
            return Ok(LinkAction::Skipped);
        }
        let backup = free_backup_path(&spec.target, stamp);
        std::fs::rename(&spec.target, &backup)?;
        tracing::debug!(backup = %backup.display(), "moved existing target aside");
        if let Err(e) = io::create_symlink(&spec.source, &spec.target, is_dir) {
            // Put the original back so the target is never left empty.
            std::fs::rename(&backup, &spec.target)?;
            return Err(e);
        }
        return Ok(LinkAction::Replaced { backup });
    }

    if let Some(parent) = spec.target.parent() {
        io::ensure_dir(parent)?;
    }
    io::create_symlink(&spec.source, &spec.target, is_dir)?;
    Ok(LinkAction::Linked)
}

/// First unused backup name for `target`; `.1`, `.2`, … are appended on collision.
fn free_backup_path(target: &Path, stamp: &str) -> PathBuf {
    let base = paths::backup_path(target, stamp);
    if !io::path_occupied(&base) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        let candidate = PathBuf::from(name);
        if !io::path_occupied(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Uninstall
// ---------------------------------------------------------------------------

/// Remove every target that is currently a symlink. Anything else is left alone.
pub fn uninstall(specs: &[LinkSpec]) -> Vec<LinkReport> {
    specs
        .iter()
        .map(|spec| {
            let action = if io::is_symlink(&spec.target) {
                match io::remove_symlink(&spec.target) {
                    Ok(()) => LinkAction::Removed,
                    Err(e) => {
                        tracing::warn!(name = %spec.name, "uninstall failed: {e}");
                        LinkAction::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            } else if io::path_occupied(&spec.target) {
                LinkAction::NotALink
            } else {
                LinkAction::NotFound
            };
            LinkReport {
                name: spec.name.clone(),
                target: spec.target.clone(),
                action,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub fn status(specs: &[LinkSpec]) -> Vec<LinkStatus> {
    specs
        .iter()
        .map(|spec| {
            let points_to = if io::is_symlink(&spec.target) {
                std::fs::read_link(&spec.target).ok()
            } else {
                None
            };
            let state = if io::links_to(&spec.target, &spec.source) {
                LinkState::Linked
            } else if points_to.is_some() {
                LinkState::WrongTarget
            } else if io::path_occupied(&spec.target) {
                LinkState::Conflict
            } else {
                LinkState::Missing
            };
            LinkStatus {
                name: spec.name.clone(),
                kind: spec.kind,
                source: spec.source.clone(),
                target: spec.target.clone(),
                source_exists: spec.source.exists(),
                state,
                points_to,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        target_dir: PathBuf,
        specs: Vec<LinkSpec>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let source_dir = dir.path().join("bundle/claude");
        let target_dir = dir.path().join("home/.claude");
        std::fs::create_dir_all(source_dir.join("agents")).unwrap();
        std::fs::create_dir_all(source_dir.join("skills")).unwrap();
        std::fs::write(source_dir.join("CLAUDE.md"), "# rules\n").unwrap();
        let specs = [
            ("agents", LinkKind::Dir),
            ("skills", LinkKind::Dir),
            ("CLAUDE.md", LinkKind::File),
        ]
        .into_iter()
        .map(|(name, kind)| LinkSpec {
            name: name.to_string(),
            kind,
            source: source_dir.join(name),
            target: target_dir.join(name),
        })
        .collect();
        Fixture {
            _dir: dir,
            target_dir,
            specs,
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn actions(reports: &[LinkReport]) -> Vec<LinkAction> {
        reports.iter().map(|r| r.action.clone()).collect()
    }

    fn backups_of(target: &Path) -> Vec<PathBuf> {
        let prefix = format!(
            "{}{}",
            target.file_name().unwrap().to_string_lossy(),
            paths::BACKUP_INFIX
        );
        let mut found: Vec<PathBuf> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(&prefix))
            .collect();
        found.sort();
        found
    }

    #[test]
    fn fresh_install_creates_parent_and_links() {
        let fx = fixture();
        assert!(!fx.target_dir.exists());

        let reports = install(&fx.specs, &mut AssumeNo, fixed_now());

        assert!(actions(&reports).iter().all(|a| *a == LinkAction::Linked));
        for spec in &fx.specs {
            assert_eq!(std::fs::read_link(&spec.target).unwrap(), spec.source);
        }
    }

    #[test]
    fn second_install_is_a_no_op() {
        let fx = fixture();
        install(&fx.specs, &mut AssumeYes, fixed_now());
        let reports = install(&fx.specs, &mut |_: &str| -> bool {
            panic!("no prompt expected on an idempotent run")
        }, fixed_now());
        assert!(actions(&reports)
            .iter()
            .all(|a| *a == LinkAction::AlreadyLinked));
    }

    #[test]
    fn declined_conflict_leaves_file_untouched() {
        let fx = fixture();
        let target = fx.target_dir.join("CLAUDE.md");
        std::fs::create_dir_all(&fx.target_dir).unwrap();
        std::fs::write(&target, "mine").unwrap();

        let mut prompts = Vec::new();
        let reports = install(
            &fx.specs,
            &mut |p: &str| {
                prompts.push(p.to_string());
                false
            },
            fixed_now(),
        );

        assert_eq!(reports[2].action, LinkAction::Skipped);
        assert_eq!(reports[0].action, LinkAction::Linked);
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("CLAUDE.md"));
        assert!(!io::is_symlink(&target));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "mine");
        assert!(backups_of(&target).is_empty());
    }

    #[test]
    fn accepted_conflict_is_backed_up_once() {
        let fx = fixture();
        let target = fx.target_dir.join("CLAUDE.md");
        std::fs::create_dir_all(&fx.target_dir).unwrap();
        std::fs::write(&target, "mine").unwrap();

        let reports = install(&fx.specs, &mut AssumeYes, fixed_now());

        let expected = fx.target_dir.join("CLAUDE.md.backup.20260314_092653");
        assert_eq!(
            reports[2].action,
            LinkAction::Replaced {
                backup: expected.clone()
            }
        );
        assert_eq!(backups_of(&target), vec![expected.clone()]);
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "mine");
        assert_eq!(std::fs::read_link(&target).unwrap(), fx.specs[2].source);
    }

    #[test]
    fn wrong_symlink_and_directory_conflicts_are_replaced() {
        let fx = fixture();
        std::fs::create_dir_all(fx.target_dir.join("skills")).unwrap();
        std::fs::write(fx.target_dir.join("skills/local.md"), "x").unwrap();
        io::create_symlink(Path::new("/nonexistent"), &fx.target_dir.join("agents"), true)
            .unwrap();

        let reports = install(&fx.specs, &mut AssumeYes, fixed_now());

        assert!(matches!(reports[0].action, LinkAction::Replaced { .. }));
        assert!(matches!(reports[1].action, LinkAction::Replaced { .. }));
        let skills_backup = fx.target_dir.join("skills.backup.20260314_092653");
        assert!(skills_backup.join("local.md").exists());
    }

    #[test]
    fn backup_name_collision_gets_suffix() {
        let fx = fixture();
        let target = fx.target_dir.join("CLAUDE.md");
        std::fs::create_dir_all(&fx.target_dir).unwrap();
        std::fs::write(&target, "first").unwrap();
        std::fs::write(
            fx.target_dir.join("CLAUDE.md.backup.20260314_092653"),
            "older",
        )
        .unwrap();

        let reports = install(&fx.specs[2..], &mut AssumeYes, fixed_now());

        let expected = fx.target_dir.join("CLAUDE.md.backup.20260314_092653.1");
        assert_eq!(
            reports[0].action,
            LinkAction::Replaced {
                backup: expected.clone()
            }
        );
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "first");
    }

    #[test]
    fn missing_source_fails_only_that_spec() {
        let mut fx = fixture();
        let hooks = LinkSpec {
            name: "hooks".to_string(),
            kind: LinkKind::Dir,
            source: fx.specs[0].source.with_file_name("hooks"),
            target: fx.target_dir.join("hooks"),
        };
        fx.specs.insert(1, hooks);

        let reports = install(&fx.specs, &mut AssumeYes, fixed_now());

        assert!(reports[1].action.is_failure());
        assert_eq!(reports[0].action, LinkAction::Linked);
        assert_eq!(reports[2].action, LinkAction::Linked);
        assert_eq!(reports[3].action, LinkAction::Linked);
        assert!(!io::path_occupied(&fx.target_dir.join("hooks")));
    }

    #[test]
    fn uninstall_round_trip_keeps_backups_and_real_files() {
        let fx = fixture();
        std::fs::create_dir_all(&fx.target_dir).unwrap();
        std::fs::write(fx.target_dir.join("CLAUDE.md"), "mine").unwrap();
        install(&fx.specs, &mut AssumeYes, fixed_now());

        let reports = uninstall(&fx.specs);
        assert!(actions(&reports).iter().all(|a| *a == LinkAction::Removed));
        for spec in &fx.specs {
            assert!(!io::path_occupied(&spec.target));
            assert!(spec.source.exists());
        }
        assert_eq!(backups_of(&fx.target_dir.join("CLAUDE.md")).len(), 1);

        let again = uninstall(&fx.specs);
        assert!(actions(&again).iter().all(|a| *a == LinkAction::NotFound));
    }

    #[test]
    fn uninstall_skips_regular_files() {
        let fx = fixture();
        std::fs::create_dir_all(&fx.target_dir).unwrap();
        std::fs::write(fx.target_dir.join("CLAUDE.md"), "mine").unwrap();

        let reports = uninstall(&fx.specs);

        assert_eq!(reports[0].action, LinkAction::NotFound);
        assert_eq!(reports[2].action, LinkAction::NotALink);
        assert_eq!(
            std::fs::read_to_string(fx.target_dir.join("CLAUDE.md")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn status_reports_each_state() {
        let fx = fixture();
        install(&fx.specs[..1], &mut AssumeYes, fixed_now());
        std::fs::create_dir_all(fx.target_dir.join("skills")).unwrap();
        io::create_symlink(
            Path::new("/elsewhere"),
            &fx.target_dir.join("CLAUDE.md"),
            false,
        )
        .unwrap();

        let st = status(&fx.specs);

        assert_eq!(st[0].state, LinkState::Linked);
        assert_eq!(st[1].state, LinkState::Conflict);
        assert_eq!(st[2].state, LinkState::WrongTarget);
        assert_eq!(st[2].points_to.as_deref(), Some(Path::new("/elsewhere")));
        assert!(st.iter().all(|s| s.source_exists));
    }

    #[test]
    fn report_serializes_flat() {
        let report = LinkReport {
            name: "hooks".to_string(),
            target: PathBuf::from("/t/hooks"),
            action: LinkAction::Replaced {
                backup: PathBuf::from("/t/hooks.backup.x"),
            },
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["action"], "replaced");
        assert_eq!(v["backup"], "/t/hooks.backup.x");
        assert_eq!(v["name"], "hooks");
    }

    #[test]
    fn link_kind_parses() {
        assert_eq!("dir".parse::<LinkKind>().unwrap(), LinkKind::Dir);
        assert!("folder".parse::<LinkKind>().is_err());
    }
}
