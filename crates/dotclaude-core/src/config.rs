use crate::error::{DotclaudeError, Result};
use crate::io;
use crate::link::{LinkKind, LinkSpec};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// LinkEntry
// ---------------------------------------------------------------------------

/// One managed entry, named the same under the source and the target dir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub name: String,
    pub kind: LinkKind,
}

impl LinkEntry {
    pub fn new(name: &str, kind: LinkKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Directories first, then files.
fn default_links() -> Vec<LinkEntry> {
    vec![
        LinkEntry::new("agents", LinkKind::Dir),
        LinkEntry::new("hooks", LinkKind::Dir),
        LinkEntry::new("skills", LinkKind::Dir),
        LinkEntry::new("CLAUDE.md", LinkKind::File),
        LinkEntry::new("settings.json", LinkKind::File),
    ]
}

// ---------------------------------------------------------------------------
// AdvisoryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    #[serde(default = "default_trigger_tool")]
    pub trigger_tool: String,
}

fn default_trigger_tool() -> String {
    "WebFetch".to_string()
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            trigger_tool: default_trigger_tool(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Program and leading args; the phrase is appended as the last argument.
    /// `None` means auto-detect a speech engine on PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    #[serde(default = "default_links")]
    pub links: Vec<LinkEntry>,
    #[serde(default = "default_afk_flag")]
    pub afk_flag: String,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_version() -> u32 {
    1
}

fn default_source_dir() -> String {
    paths::DEFAULT_SOURCE_DIR.to_string()
}

fn default_target_dir() -> String {
    paths::DEFAULT_TARGET_DIR.to_string()
}

fn default_afk_flag() -> String {
    paths::DEFAULT_AFK_FLAG.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            links: default_links(),
            afk_flag: default_afk_flag(),
            advisory: AdvisoryConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Config {
    /// Load `dotclaude.yaml` from `root`, or the defaults if there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write this config to `root` unless a config file already exists.
    /// Returns true if written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(self)?;
        io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn source_dir(&self, root: &Path) -> Result<PathBuf> {
        paths::resolve_against(root, &self.source_dir)
    }

    pub fn target_dir(&self) -> Result<PathBuf> {
        paths::expand_tilde(&self.target_dir)
    }

    pub fn afk_flag_path(&self) -> Result<PathBuf> {
        paths::expand_tilde(&self.afk_flag)
    }

    /// Build the managed link set in configured order.
    ///
    /// The source dir must be absolute: symlinks store the source text verbatim.
    pub fn link_specs(&self, root: &Path, target_dir: &Path) -> Result<Vec<LinkSpec>> {
        let source_dir = self.source_dir(root)?;
        if !source_dir.is_absolute() {
            return Err(DotclaudeError::RelativeSource(
                source_dir.display().to_string(),
            ));
        }
        Ok(self
            .links
            .iter()
            .map(|entry| LinkSpec {
                name: entry.name.clone(),
                kind: entry.kind,
                source: source_dir.join(&entry.name),
                target: target_dir.join(&entry.name),
            })
            .collect())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.links.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "links is empty: install and uninstall will do nothing".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.links {
            if !seen.insert(entry.name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate link name '{}'", entry.name),
                });
            }
            if entry.name.is_empty()
                || entry.name == "."
                || entry.name == ".."
                || entry.name.contains('/')
                || entry.name.contains('\\')
            {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "link name '{}' must be a single path component",
                        entry.name
                    ),
                });
            }
        }

        if self.advisory.trigger_tool.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "advisory.trigger_tool is empty: the advisory hook never fires"
                    .to_string(),
            });
        }

        if let Some(cmd) = &self.speech.command {
            if cmd.first().map(|p| p.trim().is_empty()).unwrap_or(true) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "speech.command has no program".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
