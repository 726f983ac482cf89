//! Temporary project trees for tests.

use crate::constants::DEFAULT_MANIFEST_FILE;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with a manifest at its root.
///
/// The directory is removed when the fixture is dropped.
pub struct ManifestFixture {
    dir: TempDir,
    manifest: PathBuf,
}

impl ManifestFixture {
    /// A `package.json` with the given content.
    pub fn new(content: &str) -> Self {
        Self::with_file(DEFAULT_MANIFEST_FILE, content)
    }

    /// A manifest under any filename, e.g. `Cargo.toml`.
    pub fn with_file(file_name: &str, content: &str) -> Self {
        let dir = TempDir::new().expect("create fixture directory");
        let manifest = dir.path().join(file_name);
        fs::write(&manifest, content).expect("write fixture manifest");
        Self {
            dir,
            manifest,
        }
    }

    /// `t-foo`, `t-bar` and `x-foo` in `dependencies`, `t-baz` in
    /// `devDependencies`, `t-peer` in `peerDependencies`.
    pub fn basic() -> Self {
        Self::new(
            r#"{
  "name": "fixture-project",
  "version": "1.0.0",
  "dependencies": {
    "t-foo": "1.0.0",
    "t-bar": "^2.1.0",
    "x-foo": "1.0.0"
  },
  "devDependencies": {
    "t-baz": "*"
  },
  "peerDependencies": {
    "t-peer": "*"
  }
}"#,
        )
    }

    /// Root of the project tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    /// Create a directory below the root and return its path.
    pub fn nested_dir(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(&path).expect("create nested fixture directory");
        path
    }

    /// Write an extra file below the root and return its path.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent directory");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }
}
