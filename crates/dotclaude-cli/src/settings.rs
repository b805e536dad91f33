use anyhow::Context;
use dotclaude_core::config::Config;
use dotclaude_core::link::LinkSpec;
use dotclaude_core::paths;
use std::path::{Path, PathBuf};

/// Config file plus command-line / env overrides, resolved to absolute paths.
pub struct Settings {
    pub root: PathBuf,
    pub config: Config,
    pub target_dir: PathBuf,
    pub afk_flag: PathBuf,
}

impl Settings {
    pub fn load(
        root: &Path,
        target: Option<&Path>,
        afk_flag: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(root).with_context(|| {
            format!("failed to load {}", paths::config_path(root).display())
        })?;
        Self::from_config(root, config, target, afk_flag)
    }

    /// Like [`Settings::load`], but an unreadable config falls back to the
    /// defaults with a warning. Paths that cannot be resolved are still errors.
    pub fn load_tolerant(
        root: &Path,
        target: Option<&Path>,
        afk_flag: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(root).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable config: {e}");
            Config::default()
        });
        Self::from_config(root, config, target, afk_flag)
    }

    /// Never fails: falls back to default paths as well. Used by hooks.
    pub fn load_lenient(root: &Path, target: Option<&Path>, afk_flag: Option<&Path>) -> Self {
        Self::load_tolerant(root, target, afk_flag).unwrap_or_else(|e| {
            tracing::warn!("falling back to default paths: {e:#}");
            Self {
                root: root.to_path_buf(),
                config: Config::default(),
                target_dir: target.map(Path::to_path_buf).unwrap_or_default(),
                afk_flag: afk_flag
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_AFK_FLAG)),
            }
        })
    }

    fn from_config(
        root: &Path,
        config: Config,
        target: Option<&Path>,
        afk_flag: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let target_dir = match target {
            Some(t) => t.to_path_buf(),
            None => config.target_dir().context("failed to resolve target_dir")?,
        };
        let afk_flag = match afk_flag {
            Some(f) => f.to_path_buf(),
            None => config.afk_flag_path().context("failed to resolve afk_flag")?,
        };
        Ok(Self {
            root: root.to_path_buf(),
            config,
            target_dir,
            afk_flag,
        })
    }

    pub fn link_specs(&self) -> anyhow::Result<Vec<LinkSpec>> {
        self.config
            .link_specs(&self.root, &self.target_dir)
            .context("failed to resolve source_dir")
    }

    pub fn alerts_db(&self) -> PathBuf {
        paths::alerts_db_path(&self.target_dir)
    }
}
