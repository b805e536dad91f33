use anyhow::Context;
use dotclaude_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the bundle root (the directory holding `dotclaude.yaml`).
///
/// Priority:
/// 1. `--root` flag / `DOTCLAUDE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `dotclaude.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
///
/// The result is always absolute; a relative `explicit` is taken from `cwd`.
pub fn resolve_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return std::path::absolute(p)
            .with_context(|| format!("failed to resolve root {}", p.display()));
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(find_upward(&cwd, |dir| paths::config_path(dir).is_file())
        .or_else(|| find_upward(&cwd, |dir| dir.join(".git").is_dir()))
        .unwrap_or(cwd))
}

fn find_upward(start: &Path, hit: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|dir| hit(dir)).map(Path::to_path_buf)
}
