//! Manifest file discovery in directory hierarchies.

use crate::core::AutoplugError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Find a manifest by searching up the directory tree from `start`.
///
/// Mirrors Cargo, Git, and NPM project file discovery behavior.
///
/// # Algorithm
///
/// 1. Check for `file_name` in the current directory
/// 2. If found, return its full path
/// 3. If not found, move to the parent directory
/// 4. Repeat until found or the filesystem root is reached
///
/// A relative `start` is taken relative to the process working directory, so
/// the walk covers that directory's real ancestors.
///
/// # Directory Structure Example
///
/// ```text
/// /home/user/project/
/// ├── package.json       ← Found here
/// └── build/
///     └── tasks/          ← Search started here, walks up
/// ```
///
/// # Examples
///
/// ```rust,no_run
/// use autoplug::manifest::find_manifest_from;
/// use std::path::Path;
///
/// match find_manifest_from(Path::new("/home/user/project/build/tasks"), "package.json") {
///     Some(path) => println!("Found manifest: {}", path.display()),
///     None => println!("No manifest found"),
/// }
/// ```
pub fn find_manifest_from(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = absolute_start(start);
    loop {
        let candidate = current.join(file_name);
        trace!("Looking for manifest at {}", candidate.display());
        if candidate.is_file() {
            debug!("Discovered manifest {}", candidate.display());
            return Some(candidate);
        }

        if !current.pop() {
            debug!("No {} found above {}", file_name, start.display());
            return None;
        }
    }
}

fn absolute_start(start: &Path) -> PathBuf {
    if start.is_absolute() {
        return start.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(start),
        Err(e) => {
            debug!("Cannot determine working directory ({}), searching from {}", e, start.display());
            start.to_path_buf()
        }
    }
}

/// Like [`find_manifest_from`], but a miss is an error.
///
/// # Errors
///
/// Returns [`AutoplugError::ManifestNotFound`] wrapped in an [`anyhow::Error`]
/// if no manifest file is found after searching to the filesystem root.
pub fn find_manifest(start: &Path, file_name: &str) -> Result<PathBuf> {
    find_manifest_from(start, file_name).ok_or_else(|| {
        AutoplugError::ManifestNotFound {
            file: file_name.to_string(),
        }
        .into()
    })
}
