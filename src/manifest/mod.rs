//! Dependency manifests scanned for plugin candidates.
//!
//! A [`Manifest`] is a document of named sections, each mapping package
//! names to versions. It is the shape shared by `package.json`
//! (`dependencies`, `devDependencies`, ...) and `Cargo.toml`
//! (`dependencies`, `dev-dependencies`, ...).
//!
//! # Basic Structure
//!
//! ```json
//! {
//!   "name": "my-build",
//!   "dependencies": { "taskrunner-lint": "^1.2.0" },
//!   "devDependencies": { "taskrunner-test": "*" }
//! }
//! ```
//!
//! # Dependency Formats
//!
//! - **Simple**: `"taskrunner-lint": "^1.2.0"`
//! - **Detailed**: `taskrunner-lint = { version = "1.2", features = ["x"] }`; the
//!   `version` key is recorded, or `*` when the table has none
//!
//! Top-level entries that are not mappings (`name`, `version`, `scripts`
//! holding strings) are kept out of the section list and never scanned.
//!
//! Section and key order follow the source document, so scanning is
//! deterministic and matches what the user wrote.

pub mod helpers;
pub mod manifest_io;

use crate::constants::ANY_VERSION;
use crate::core::AutoplugError;
use anyhow::Result;
use serde_json::Value;
use std::path::Path;

pub use helpers::{find_manifest, find_manifest_from};

/// One named dependency table of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSection {
    name: String,
    dependencies: Vec<(String, String)>,
}

impl ManifestSection {
    /// Section name, e.g. `dependencies`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|(name, _)| name.as_str())
    }

    /// Version requirement recorded for `package`.
    pub fn version(&self, package: &str) -> Option<&str> {
        self.dependencies.iter().find(|(name, _)| name == package).map(|(_, v)| v.as_str())
    }

    /// Number of dependencies in this section.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether this section declares no dependencies.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    fn insert(&mut self, package: String, version: String) {
        match self.dependencies.iter_mut().find(|(name, _)| *name == package) {
            Some(entry) => entry.1 = version,
            None => self.dependencies.push((package, version)),
        }
    }
}

/// A parsed dependency manifest.
///
/// # Examples
///
/// ```rust
/// use autoplug::manifest::Manifest;
///
/// let manifest = Manifest::new()
///     .with_section("dependencies", [("t-foo", "1.0.0"), ("x-bar", "*")])
///     .with_section("devDependencies", [("t-baz", "^2")]);
///
/// let names = manifest.scan(&["dependencies".to_string(), "peerDependencies".to_string()]);
/// assert_eq!(names, vec!["t-foo", "x-bar"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    sections: Vec<ManifestSection>,
}

impl Manifest {
    /// An empty manifest with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a section with `(package, version)` entries.
    ///
    /// Repeating a package name within a section replaces its version.
    #[must_use]
    pub fn with_section<I, N, V>(mut self, section: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let target = self.section_mut(section);
        for (name, version) in entries {
            target.insert(name.into(), version.into());
        }
        self
    }

    /// Build a manifest from a structured document.
    ///
    /// # Errors
    ///
    /// Returns [`AutoplugError::ManifestNotFound`] when the document itself
    /// is not a mapping, since no dependency sections can be resolved from it.
    pub fn from_value(value: &Value, file_name: &str) -> Result<Self> {
        let Value::Object(document) = value else {
            return Err(AutoplugError::ManifestNotFound {
                file: file_name.to_string(),
            }
            .into());
        };

        let mut manifest = Self::new();
        for (section_name, section) in document {
            let Value::Object(entries) = section else {
                continue;
            };
            let target = manifest.section_mut(section_name);
            for (package, spec) in entries {
                target.insert(package.clone(), version_of(spec));
            }
        }
        Ok(manifest)
    }

    /// Load a manifest file; see [`manifest_io::load_document`] for formats.
    pub fn load(path: &Path) -> Result<Self> {
        let document = manifest_io::load_document(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_value(&document, &file_name)
    }

    /// Look up a section by name.
    pub fn section(&self, name: &str) -> Option<&ManifestSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// All sections in document order.
    pub fn sections(&self) -> &[ManifestSection] {
        &self.sections
    }

    /// Collect the dependency names of every section named in `scope`.
    ///
    /// Names appear in scope order, then in document order within each
    /// section. A name declared in two scanned sections appears twice.
    /// Sections missing from the manifest contribute nothing.
    pub fn scan(&self, scope: &[String]) -> Vec<String> {
        scope
            .iter()
            .filter_map(|section| self.section(section))
            .flat_map(|section| section.names().map(str::to_string))
            .collect()
    }

    fn section_mut(&mut self, name: &str) -> &mut ManifestSection {
        let index = match self.sections.iter().position(|section| section.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(ManifestSection {
                    name: name.to_string(),
                    dependencies: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

fn version_of(spec: &Value) -> String {
    match spec {
        Value::String(version) => version.clone(),
        Value::Object(table) => table
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(ANY_VERSION)
            .to_string(),
        _ => ANY_VERSION.to_string(),
    }
}
