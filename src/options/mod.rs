//! Options accepted by autoplug and their resolution.
//!
//! Callers describe an invocation with [`Options`], a bag of raw values
//! keyed by [`OptionName`]. Nothing is validated when a value is set; the
//! [`resolver`] checks every value against the kinds its option accepts,
//! fills in defaults (some computed from other options) and produces the
//! immutable [`Config`] the pipeline runs on.
//!
//! # Recognized options
//!
//! | option               | accepts                        | default                                   |
//! |----------------------|--------------------------------|-------------------------------------------|
//! | `camelize`           | boolean                        | `true`                                    |
//! | `lazy`               | boolean                        | `true`                                    |
//! | `rename`             | map of string                  | empty                                     |
//! | `scope`              | string or list of string       | `["dependencies", "devDependencies"]`     |
//! | `manifest_file`      | non-empty string               | `package.json`                            |
//! | `host`               | host                           | current directory, empty module registry  |
//! | `manifest`           | manifest or path               | discovered from the host directory upward |
//! | `loader`             | loader                         | the host's module registry                |
//! | `prefix`             | non-empty string               | none                                      |
//! | `pattern`            | string or list of string       | `["<prefix>-*", "<prefix>.*"]`            |
//! | `replace_expression` | regular expression             | `^<prefix>([.-])`                         |
//!
//! The table order is the resolution order: an option's computed default
//! only reads options listed above it.
//!
//! # Examples
//!
//! ```rust
//! use autoplug::manifest::Manifest;
//! use autoplug::options::Options;
//!
//! let options = Options::new()
//!     .prefix("taskrunner")
//!     .camelize(false)
//!     .rename([("taskrunner-legacy-lint", "lint")])
//!     .manifest(Manifest::new().with_section("dependencies", [("taskrunner-x", "1")]))
//!     .loader(|name: &str| Ok(name.to_string()));
//! # let _ = options;
//! ```

pub mod config;
pub mod file;
pub mod kind;
pub mod resolver;

pub use config::Config;
pub use file::OptionsFile;
pub use kind::ValueKind;
pub use resolver::resolve;

use crate::loader::{Host, Loader};
use crate::manifest::Manifest;
use anyhow::Result;
use kind::{STRING_LIST, STRING_MAP};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Names of the recognized options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionName {
    /// Convert dash-separated remainders to camelCase
    Camelize,
    /// Defer loading until a plugin is accessed
    Lazy,
    /// Explicit dependency name → property name overrides
    Rename,
    /// Manifest sections to scan
    Scope,
    /// Conventional manifest filename used for discovery
    ManifestFile,
    /// The embedding caller
    Host,
    /// The dependency manifest, or a path to it
    Manifest,
    /// Function resolving a dependency name into its module
    Loader,
    /// Naming convention shared by the plugins
    Prefix,
    /// Glob include/exclude rules
    Pattern,
    /// Expression stripping the prefix segment
    ReplaceExpression,
}

impl OptionName {
    /// Order in which options are resolved; dependents come after the
    /// options their defaults are computed from.
    pub const RESOLUTION_ORDER: [OptionName; 11] = [
        Self::Camelize,
        Self::Lazy,
        Self::Rename,
        Self::Scope,
        Self::ManifestFile,
        Self::Host,
        Self::Manifest,
        Self::Loader,
        Self::Prefix,
        Self::Pattern,
        Self::ReplaceExpression,
    ];

    /// The option's canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camelize => "camelize",
            Self::Lazy => "lazy",
            Self::Rename => "rename",
            Self::Scope => "scope",
            Self::ManifestFile => "manifest_file",
            Self::Host => "host",
            Self::Manifest => "manifest",
            Self::Loader => "loader",
            Self::Prefix => "prefix",
            Self::Pattern => "pattern",
            Self::ReplaceExpression => "replace_expression",
        }
    }

    /// Look up an option by canonical or camelCase name.
    pub fn from_name(name: &str) -> Option<Self> {
        let option = match name {
            "camelize" => Self::Camelize,
            "lazy" => Self::Lazy,
            "rename" => Self::Rename,
            "scope" => Self::Scope,
            "manifest_file" | "manifestFile" => Self::ManifestFile,
            "host" => Self::Host,
            "manifest" => Self::Manifest,
            "loader" => Self::Loader,
            "prefix" => Self::Prefix,
            "pattern" => Self::Pattern,
            "replace_expression" | "replaceExpression" => Self::ReplaceExpression,
            _ => return None,
        };
        Some(option)
    }

    /// Kinds a caller value must have to be accepted.
    pub fn kinds(self) -> &'static [ValueKind] {
        match self {
            Self::Camelize | Self::Lazy => &[ValueKind::Boolean],
            Self::Rename => &[STRING_MAP],
            Self::Scope | Self::Pattern => &[ValueKind::String, STRING_LIST],
            Self::ManifestFile | Self::Prefix => &[ValueKind::NonEmptyString],
            Self::Host => &[ValueKind::Host],
            Self::Manifest => &[ValueKind::Manifest, ValueKind::Path, ValueKind::NonEmptyString],
            Self::Loader => &[ValueKind::Loader],
            Self::ReplaceExpression => &[ValueKind::Regex],
        }
    }

    /// Whether `value` is acceptable for this option.
    pub fn accepts<T>(self, value: &OptionValue<T>) -> bool {
        kind::matches_any(self.kinds(), value)
    }

    /// Bring an accepted value into its canonical shape.
    ///
    /// Options that take "one or many" wrap a single string into a list, and
    /// a manifest given as a string becomes a path.
    pub fn normalize<T>(self, value: OptionValue<T>) -> OptionValue<T> {
        match (self, value) {
            (Self::Scope | Self::Pattern, OptionValue::String(single)) => {
                OptionValue::List(vec![OptionValue::String(single)])
            }
            (Self::Manifest, OptionValue::String(path)) => OptionValue::Path(PathBuf::from(path)),
            (_, value) => value,
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw option value, as supplied by a caller.
pub enum OptionValue<T> {
    /// A string
    String(String),
    /// A boolean
    Bool(bool),
    /// A compiled regular expression
    Regex(Regex),
    /// A filesystem path
    Path(PathBuf),
    /// A list of values
    List(Vec<OptionValue<T>>),
    /// A string-keyed map of values
    Map(BTreeMap<String, OptionValue<T>>),
    /// A parsed manifest
    Manifest(Manifest),
    /// A module loader
    Loader(Arc<dyn Loader<T>>),
    /// An embedding host
    Host(Host<T>),
}

impl<T> OptionValue<T> {
    /// The string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Strings of a list value; non-string items are skipped.
    pub fn string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => {
                Some(items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect())
            }
            _ => None,
        }
    }

    /// String entries of a map value; non-string values are skipped.
    pub fn string_map(&self) -> Option<BTreeMap<String, String>> {
        match self {
            Self::Map(entries) => Some(
                entries
                    .iter()
                    .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<T> Clone for OptionValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::String(s) => Self::String(s.clone()),
            Self::Bool(b) => Self::Bool(*b),
            Self::Regex(r) => Self::Regex(r.clone()),
            Self::Path(p) => Self::Path(p.clone()),
            Self::List(items) => Self::List(items.clone()),
            Self::Map(entries) => Self::Map(entries.clone()),
            Self::Manifest(m) => Self::Manifest(m.clone()),
            Self::Loader(l) => Self::Loader(Arc::clone(l)),
            Self::Host(h) => Self::Host(h.clone()),
        }
    }
}

impl<T> fmt::Debug for OptionValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Self::Manifest(m) => f.debug_tuple("Manifest").field(m).finish(),
            Self::Loader(_) => f.write_str("Loader(..)"),
            Self::Host(h) => f.debug_tuple("Host").field(h).finish(),
        }
    }
}

impl<T> From<&str> for OptionValue<T> {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T> From<String> for OptionValue<T> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<bool> for OptionValue<T> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T> From<Regex> for OptionValue<T> {
    fn from(value: Regex) -> Self {
        Self::Regex(value)
    }
}

impl<T> From<PathBuf> for OptionValue<T> {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl<T> From<Manifest> for OptionValue<T> {
    fn from(value: Manifest) -> Self {
        Self::Manifest(value)
    }
}

impl<T> From<Host<T>> for OptionValue<T> {
    fn from(value: Host<T>) -> Self {
        Self::Host(value)
    }
}

impl<T, S: Into<String>> From<Vec<S>> for OptionValue<T> {
    fn from(values: Vec<S>) -> Self {
        Self::List(values.into_iter().map(|s| Self::String(s.into())).collect())
    }
}

/// Caller-supplied options, unvalidated.
///
/// Setting an option twice keeps the last value. Values are only checked
/// when the options are resolved.
pub struct Options<T> {
    values: BTreeMap<OptionName, OptionValue<T>>,
}

impl<T> Options<T> {
    /// No options set; every option takes its default.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Set any option to a raw value.
    #[must_use]
    pub fn set(mut self, name: OptionName, value: impl Into<OptionValue<T>>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// The raw value of an option, if set.
    pub fn get(&self, name: OptionName) -> Option<&OptionValue<T>> {
        self.values.get(&name)
    }

    /// Whether an option was set, valid or not.
    pub fn contains(&self, name: OptionName) -> bool {
        self.values.contains_key(&name)
    }

    /// Whether an option was set to a value of an accepted kind.
    pub fn is_valid(&self, name: OptionName) -> bool {
        self.get(name).is_some_and(|value| name.accepts(value))
    }

    /// Remove an option so that it resolves to its default.
    pub fn unset(&mut self, name: OptionName) -> Option<OptionValue<T>> {
        self.values.remove(&name)
    }

    /// Plugin naming convention, e.g. `taskrunner` for `taskrunner-*`.
    #[must_use]
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.set(OptionName::Prefix, OptionValue::String(prefix.into()))
    }

    /// A single glob pattern.
    #[must_use]
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.set(OptionName::Pattern, OptionValue::String(pattern.into()))
    }

    /// Several glob patterns; prefix one with `!` to exclude.
    #[must_use]
    pub fn patterns<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(OptionName::Pattern, patterns.into_iter().collect::<Vec<S>>())
    }

    /// Expression whose first match is stripped from each matched name.
    #[must_use]
    pub fn replace_expression(self, expression: Regex) -> Self {
        self.set(OptionName::ReplaceExpression, expression)
    }

    /// Manifest sections to scan.
    #[must_use]
    pub fn scope<I, S>(self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(OptionName::Scope, sections.into_iter().collect::<Vec<S>>())
    }

    /// Use an already-parsed manifest.
    #[must_use]
    pub fn manifest(self, manifest: Manifest) -> Self {
        self.set(OptionName::Manifest, manifest)
    }

    /// Load the manifest from a file.
    #[must_use]
    pub fn manifest_path(self, path: impl Into<PathBuf>) -> Self {
        self.set(OptionName::Manifest, OptionValue::Path(path.into()))
    }

    /// Manifest filename searched for during discovery, e.g. `Cargo.toml`.
    #[must_use]
    pub fn manifest_file(self, file_name: impl Into<String>) -> Self {
        self.set(OptionName::ManifestFile, OptionValue::String(file_name.into()))
    }

    /// Convert dash-separated remainders to camelCase.
    #[must_use]
    pub fn camelize(self, camelize: bool) -> Self {
        self.set(OptionName::Camelize, camelize)
    }

    /// Defer loading until access.
    #[must_use]
    pub fn lazy(self, lazy: bool) -> Self {
        self.set(OptionName::Lazy, lazy)
    }

    /// Explicit property names for specific dependencies.
    #[must_use]
    pub fn rename<I, K, V>(self, renames: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = renames
            .into_iter()
            .map(|(from, to)| (from.into(), OptionValue::String(to.into())))
            .collect();
        self.set(OptionName::Rename, OptionValue::Map(entries))
    }

    /// Load modules with a closure.
    #[must_use]
    pub fn loader<F>(self, loader: F) -> Self
    where
        F: Fn(&str) -> Result<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.loader_arc(Arc::new(loader))
    }

    /// Load modules with a shared loader, such as a
    /// [`ModuleRegistry`](crate::loader::ModuleRegistry).
    #[must_use]
    pub fn loader_arc(self, loader: Arc<dyn Loader<T>>) -> Self {
        self.set(OptionName::Loader, OptionValue::Loader(loader))
    }

    /// The embedding caller.
    #[must_use]
    pub fn host(self, host: Host<T>) -> Self {
        self.set(OptionName::Host, host)
    }

    /// Merge `update` over these options.
    ///
    /// Values in `update` replace existing ones. When `update` carries a
    /// valid option that other defaults are computed from, those dependents
    /// are reset to their defaults unless `update` also gives valid values
    /// for them:
    ///
    /// - a new `prefix` resets `pattern` and `replace_expression`;
    /// - a new `host` resets `manifest` and `loader`.
    pub fn merge(&mut self, update: Options<T>) {
        const RELATIONS: [(OptionName, [OptionName; 2]); 2] = [
            (OptionName::Prefix, [OptionName::Pattern, OptionName::ReplaceExpression]),
            (OptionName::Host, [OptionName::Manifest, OptionName::Loader]),
        ];

        for (relative, heirs) in RELATIONS {
            if !update.is_valid(relative) {
                continue;
            }
            for heir in heirs {
                if !update.is_valid(heir) && self.unset(heir).is_some() {
                    debug!("'{}' changed; '{}' reverts to its default", relative, heir);
                }
            }
        }

        self.values.extend(update.values);
    }

    pub(crate) fn into_values(self) -> BTreeMap<OptionName, OptionValue<T>> {
        self.values
    }
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

/// Everything a caller may pass to start an invocation.
///
/// A bare string is shorthand for the `prefix` option.
#[derive(Debug)]
pub enum OptionsInput<T> {
    /// Nothing given; every option takes its default
    None,
    /// Prefix shorthand
    Prefix(String),
    /// A full set of options
    Options(Options<T>),
}

impl<T> OptionsInput<T> {
    /// Normalize into an options bag.
    pub fn into_options(self) -> Options<T> {
        match self {
            Self::None => Options::new(),
            Self::Prefix(prefix) => Options::new().prefix(prefix),
            Self::Options(options) => options,
        }
    }
}

impl<T> From<()> for OptionsInput<T> {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl<T> From<&str> for OptionsInput<T> {
    fn from(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }
}

impl<T> From<String> for OptionsInput<T> {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

impl<T> From<Options<T>> for OptionsInput<T> {
    fn from(options: Options<T>) -> Self {
        Self::Options(options)
    }
}

impl<T> From<Option<Options<T>>> for OptionsInput<T> {
    fn from(options: Option<Options<T>>) -> Self {
        options.map_or(Self::None, Self::Options)
    }
}
