//! Fire-and-forget text-to-speech.
//!
//! A [`Speaker`] starts playback and returns immediately; callers never wait
//! for audio to finish. [`CommandSpeaker`] runs an external engine as a
//! detached child process.
//!
//! # Engine priority
//! 1. `DOTCLAUDE_SPEECH_CMD` (whitespace-separated program and args)
//! 2. `speech.command` from `dotclaude.yaml`
//! 3. the first of `say`, `spd-say`, `espeak` found on PATH

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::Result;

pub const SPEECH_CMD_ENV: &str = "DOTCLAUDE_SPEECH_CMD";

const ENGINES: &[&str] = &["say", "spd-say", "espeak"];

pub trait Speaker {
    /// Start speaking `phrase` without waiting for playback to end.
    fn speak(&self, phrase: &str) -> Result<()>;
}

/// Used when no engine is available.
pub struct Silent;

impl Speaker for Silent {
    fn speak(&self, phrase: &str) -> Result<()> {
        tracing::warn!("no speech engine found; not speaking: {phrase}");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpeaker {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from `[program, args...]`; `None` if there is no program.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self::new(program, args.to_vec()))
    }

    pub fn detect() -> Option<Self> {
        ENGINES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(|program| Self::new(program, Vec::new()))
    }

    /// Pick the engine: env override, then `configured`, then PATH detection.
    pub fn resolve(configured: Option<&[String]>) -> Option<Self> {
        let env = std::env::var(SPEECH_CMD_ENV).ok();
        Self::resolve_with(env.as_deref(), configured).or_else(Self::detect)
    }

    /// The explicit part of [`CommandSpeaker::resolve`]: `env` (whitespace
    /// separated) beats `configured`. Blank values are skipped.
    pub fn resolve_with(env: Option<&str>, configured: Option<&[String]>) -> Option<Self> {
        if let Some(raw) = env {
            let argv: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
            if let Some(speaker) = Self::from_argv(&argv) {
                return Some(speaker);
            }
        }
        configured.and_then(Self::from_argv)
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, phrase: &str) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(phrase)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // Not waited on: playback outlives this process.
        tracing::debug!(pid = child.id(), program = %self.program.display(), "speech started");
        Ok(())
    }
}
