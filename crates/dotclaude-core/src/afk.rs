//! AFK ("away from keyboard") mode.
//!
//! The state is the existence of a flag file; its content is never read.
//! [`AfkState::next`] is the pure transition, [`FlagStore`] the persistence.

use crate::error::{DotclaudeError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AfkState {
    On,
    Off,
}

impl AfkState {
    pub fn from_flag(set: bool) -> Self {
        if set {
            AfkState::On
        } else {
            AfkState::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == AfkState::On
    }

    /// An explicit request forces the state; no request flips it.
    pub fn next(self, request: Option<AfkState>) -> AfkState {
        match request {
            Some(forced) => forced,
            None => match self {
                AfkState::On => AfkState::Off,
                AfkState::Off => AfkState::On,
            },
        }
    }
}

impl std::fmt::Display for AfkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfkState::On => f.write_str("ON"),
            AfkState::Off => f.write_str("OFF"),
        }
    }
}

impl std::str::FromStr for AfkState {
    type Err = DotclaudeError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(AfkState::On),
            "off" => Ok(AfkState::Off),
            _ => Err(DotclaudeError::InvalidAfkState(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FlagStore
// ---------------------------------------------------------------------------

pub trait FlagStore {
    fn is_set(&self) -> bool;
    fn set(&mut self) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Flag persisted as an empty file at a fixed path.
pub struct FileFlag {
    path: PathBuf,
}

impl FileFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagStore for FileFlag {
    fn is_set(&self) -> bool {
        self.path.exists()
    }

    fn set(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn current(store: &dyn FlagStore) -> AfkState {
    AfkState::from_flag(store.is_set())
}

/// Apply `request` (or flip) and persist the result.
pub fn toggle(store: &mut dyn FlagStore, request: Option<AfkState>) -> Result<AfkState> {
    let next = current(store).next(request);
    match next {
        AfkState::On => store.set()?,
        AfkState::Off => store.clear()?,
    }
    tracing::debug!(state = %next, "afk state written");
    Ok(next)
}
