//! Resolved, validated configuration for one invocation.

use crate::loader::{Host, Loader};
use crate::manifest::Manifest;
use crate::naming::NameTransformer;
use crate::pattern::NameFilter;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Options after defaults, normalization and validation.
///
/// Produced by [`resolve`](super::resolve); every field holds a value of the
/// right kind, the pattern list ends with the self-exclusion and the
/// manifest has been loaded.
pub struct Config<T> {
    pub(crate) prefix: Option<String>,
    pub(crate) pattern: Vec<String>,
    pub(crate) replace_expression: Regex,
    pub(crate) scope: Vec<String>,
    pub(crate) manifest: Manifest,
    pub(crate) manifest_file: String,
    pub(crate) camelize: bool,
    pub(crate) lazy: bool,
    pub(crate) rename: BTreeMap<String, String>,
    pub(crate) host: Host<T>,
    pub(crate) loader: Arc<dyn Loader<T>>,
    pub(crate) filter: NameFilter,
}

impl<T> Config<T> {
    /// The plugin prefix, when one was given.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Glob patterns, ending with the self-exclusion.
    pub fn pattern(&self) -> &[String] {
        &self.pattern
    }

    /// Expression stripped from matched names.
    pub fn replace_expression(&self) -> &Regex {
        &self.replace_expression
    }

    /// Manifest sections scanned.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// The loaded manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Manifest filename used for discovery.
    pub fn manifest_file(&self) -> &str {
        &self.manifest_file
    }

    pub fn camelize(&self) -> bool {
        self.camelize
    }

    pub fn lazy(&self) -> bool {
        self.lazy
    }

    /// Explicit property names.
    pub fn rename(&self) -> &BTreeMap<String, String> {
        &self.rename
    }

    /// The embedding caller.
    pub fn host(&self) -> &Host<T> {
        &self.host
    }

    /// Loader used for every matched dependency.
    pub fn loader(&self) -> &Arc<dyn Loader<T>> {
        &self.loader
    }

    /// The compiled pattern list.
    pub fn filter(&self) -> &NameFilter {
        &self.filter
    }

    /// Property-name derivation for this configuration.
    pub fn transformer(&self) -> NameTransformer {
        NameTransformer::new(self.replace_expression.clone(), self.camelize, self.rename.clone())
    }
}

impl<T> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("prefix", &self.prefix)
            .field("pattern", &self.pattern)
            .field("replace_expression", &self.replace_expression.as_str())
            .field("scope", &self.scope)
            .field("manifest_file", &self.manifest_file)
            .field("camelize", &self.camelize)
            .field("lazy", &self.lazy)
            .field("rename", &self.rename)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
