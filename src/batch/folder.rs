//! Output folder provisioning.
use crate::common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do when the output folder already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingFolder {
    /// Reuse the existing folder
    #[default]
    Reuse,
    /// Fail with `DirectoryExists`
    Fail,
}

/// The user's desktop, falling back to `<home>/Desktop`.
pub fn default_output_root() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}

/// Ensure `root/name` exists as a directory and return its path.
///
/// Missing parents are created. A path that exists but is not a directory
/// is a `DirectoryExists` error under either policy.
pub fn ensure_output_folder(root: &Path, name: &str, policy: ExistingFolder) -> Result<PathBuf> {
    let path = root.join(name);

    if path.exists() {
        if !path.is_dir() || policy == ExistingFolder::Fail {
            return Err(Error::DirectoryExists(path));
        }
        debug!(path = %path.display(), "reusing output folder");
        return Ok(path);
    }

    std::fs::create_dir_all(&path).map_err(|e| Error::write(&path, e))?;
    debug!(path = %path.display(), "created output folder");
    Ok(path)
}
