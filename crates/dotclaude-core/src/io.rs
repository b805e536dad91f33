use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// True if anything occupies `path`, including a dangling symlink.
pub fn path_occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// True if `path` itself is a symlink (not followed).
pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// True if `link` is a symlink whose stored destination is exactly `dest`.
pub fn links_to(link: &Path, dest: &Path) -> bool {
    is_symlink(link)
        && std::fs::read_link(link)
            .map(|current| current == dest)
            .unwrap_or(false)
}

/// Create a symlink at `link` pointing to `dest`.
#[cfg(unix)]
pub fn create_symlink(dest: &Path, link: &Path, _is_dir: bool) -> Result<()> {
    std::os::unix::fs::symlink(dest, link)?;
    Ok(())
}

/// Create a symlink at `link` pointing to `dest`.
#[cfg(windows)]
pub fn create_symlink(dest: &Path, link: &Path, is_dir: bool) -> Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(dest, link)?;
    } else {
        std::os::windows::fs::symlink_file(dest, link)?;
    }
    Ok(())
}

/// Remove a symlink without touching what it points to.
pub fn remove_symlink(link: &Path) -> Result<()> {
    #[cfg(windows)]
    {
        // Directory symlinks on Windows must be removed as directories.
        if std::fs::metadata(link).map(|m| m.is_dir()).unwrap_or(false) {
            std::fs::remove_dir(link)?;
            return Ok(());
        }
    }
    std::fs::remove_file(link)?;
    Ok(())
}
