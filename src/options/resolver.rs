//! Schema-ordered option resolution.
//!
//! [`resolve`] walks [`OptionName::RESOLUTION_ORDER`] once. For each option
//! the caller's value is kept when it has an accepted kind; otherwise the
//! option's default is computed from the options resolved before it. A
//! post-resolution hook then runs (the pattern list gains the
//! self-exclusion). After the walk:
//!
//! 1. the global validity rule is checked, before any manifest is located or read;
//! 2. the manifest is loaded from its path, or discovered upward from the
//!    host directory when none was given;
//! 3. the pattern list is compiled.

use super::kind::describe;
use super::{Config, OptionName, OptionValue, Options};
use crate::constants::{DEFAULT_MANIFEST_FILE, DEFAULT_SCOPE, self_exclusion};
use crate::core::AutoplugError;
use crate::loader::{Host, Loader};
use crate::manifest::{Manifest, find_manifest_from};
use crate::pattern::NameFilter;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Expression stripping `prefix` and the separator after it.
///
/// Regex metacharacters in the prefix are matched literally.
///
/// # Examples
///
/// ```rust
/// use autoplug::options::resolver::prefix_expression;
///
/// let expression = prefix_expression("grunt.contrib").unwrap();
/// assert!(expression.is_match("grunt.contrib-watch"));
/// assert!(!expression.is_match("gruntxcontrib-watch"));
/// ```
pub fn prefix_expression(prefix: &str) -> Result<Regex> {
    let source = format!("^{}([.-])", regex::escape(prefix));
    Regex::new(&source).with_context(|| format!("Failed to build the replace expression for prefix '{prefix}'"))
}

/// Default include patterns for `prefix`.
pub fn prefix_patterns(prefix: &str) -> Vec<String> {
    vec![format!("{prefix}-*"), format!("{prefix}.*")]
}

struct Resolution<T> {
    values: BTreeMap<OptionName, OptionValue<T>>,
    explicit: BTreeSet<OptionName>,
}

impl<T> Resolution<T>
where
    T: Clone + Send + 'static,
{
    fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            explicit: BTreeSet::new(),
        }
    }

    fn string(&self, name: OptionName) -> Option<&str> {
        self.values.get(&name).and_then(OptionValue::as_str)
    }

    fn host(&self) -> Option<&Host<T>> {
        match self.values.get(&OptionName::Host) {
            Some(OptionValue::Host(host)) => Some(host),
            _ => None,
        }
    }

    /// Default for `name`, computed from the options resolved so far.
    fn default_for(&self, name: OptionName) -> Result<Option<OptionValue<T>>> {
        let value = match name {
            OptionName::Camelize | OptionName::Lazy => Some(OptionValue::Bool(true)),
            OptionName::Rename => Some(OptionValue::Map(BTreeMap::new())),
            OptionName::Scope => Some(OptionValue::from(DEFAULT_SCOPE.to_vec())),
            OptionName::ManifestFile => Some(OptionValue::from(DEFAULT_MANIFEST_FILE)),
            OptionName::Host => Some(OptionValue::Host(Host::current()?)),
            // Discovered in `into_config`, once the options are known to be valid.
            OptionName::Manifest => None,
            OptionName::Loader => self.host().map(|host| {
                let registry: Arc<dyn Loader<T>> = host.registry().clone();
                OptionValue::Loader(registry)
            }),
            OptionName::Prefix => None,
            OptionName::Pattern => {
                self.string(OptionName::Prefix).map(|prefix| OptionValue::from(prefix_patterns(prefix)))
            }
            OptionName::ReplaceExpression => match self.string(OptionName::Prefix) {
                Some(prefix) => Some(OptionValue::Regex(prefix_expression(prefix)?)),
                None => None,
            },
        };
        Ok(value)
    }

    fn after_resolve(name: OptionName, value: OptionValue<T>) -> OptionValue<T> {
        match (name, value) {
            (OptionName::Pattern, OptionValue::List(mut patterns)) => {
                let exclusion = self_exclusion();
                if patterns.last().and_then(OptionValue::as_str) != Some(exclusion.as_str()) {
                    patterns.push(OptionValue::String(exclusion));
                }
                OptionValue::List(patterns)
            }
            (_, value) => value,
        }
    }

    fn resolve_option(&mut self, name: OptionName, raw: Option<OptionValue<T>>) -> Result<()> {
        let value = match raw {
            Some(value) if name.accepts(&value) => {
                self.explicit.insert(name);
                Some(name.normalize(value))
            }
            Some(value) => {
                debug!(
                    "Ignoring invalid '{}' option {:?}: expected {}",
                    name,
                    value,
                    describe(name.kinds())
                );
                self.default_for(name)?
            }
            None => self.default_for(name)?,
        };

        if let Some(value) = value {
            self.values.insert(name, Self::after_resolve(name, value));
        }
        Ok(())
    }

    /// A usable prefix, or an explicit pattern list and replace expression.
    fn check_validity(&self) -> Result<()> {
        if self.string(OptionName::Prefix).is_some() {
            return Ok(());
        }

        let mut invalid = vec![OptionName::Prefix.to_string()];
        for name in [OptionName::Pattern, OptionName::ReplaceExpression] {
            if !self.explicit.contains(&name) {
                invalid.push(name.to_string());
            }
        }
        if invalid.len() == 1 {
            return Ok(());
        }

        Err(AutoplugError::InvalidOptions {
            invalid,
        }
        .into())
    }

    fn take(&mut self, name: OptionName) -> Result<OptionValue<T>> {
        self.values.remove(&name).ok_or_else(|| {
            AutoplugError::Other {
                message: format!("option '{name}' was not resolved"),
            }
            .into()
        })
    }

    fn into_config(mut self) -> Result<Config<T>> {
        let manifest_file = match self.take(OptionName::ManifestFile)? {
            OptionValue::String(file) => file,
            _ => DEFAULT_MANIFEST_FILE.to_string(),
        };
        let OptionValue::Host(host) = self.take(OptionName::Host)? else {
            return Err(unresolved(OptionName::Host));
        };
        let manifest = match self.values.remove(&OptionName::Manifest) {
            Some(OptionValue::Manifest(manifest)) => manifest,
            Some(OptionValue::Path(path)) => load_manifest(&host, &path)?,
            _ => match find_manifest_from(host.base_dir(), &manifest_file) {
                Some(path) => Manifest::load(&path)?,
                None => {
                    return Err(AutoplugError::ManifestNotFound {
                        file: manifest_file,
                    }
                    .into());
                }
            },
        };
        let OptionValue::Loader(loader) = self.take(OptionName::Loader)? else {
            return Err(unresolved(OptionName::Loader));
        };
        let OptionValue::Regex(replace_expression) = self.take(OptionName::ReplaceExpression)? else {
            return Err(unresolved(OptionName::ReplaceExpression));
        };

        let pattern = self.take(OptionName::Pattern)?.string_list().unwrap_or_default();
        let filter = NameFilter::new(&pattern)?;

        Ok(Config {
            prefix: self.string(OptionName::Prefix).map(str::to_string),
            pattern,
            replace_expression,
            scope: self.take(OptionName::Scope)?.string_list().unwrap_or_default(),
            manifest,
            manifest_file,
            camelize: self.take(OptionName::Camelize)?.as_bool().unwrap_or(true),
            lazy: self.take(OptionName::Lazy)?.as_bool().unwrap_or(true),
            rename: self.take(OptionName::Rename)?.string_map().unwrap_or_default(),
            host,
            loader,
            filter,
        })
    }
}

fn unresolved(name: OptionName) -> anyhow::Error {
    AutoplugError::Other {
        message: format!("option '{name}' resolved to an unexpected kind"),
    }
    .into()
}

fn load_manifest<T>(host: &Host<T>, path: &Path) -> Result<Manifest> {
    let path = if path.is_relative() {
        host.base_dir().join(path)
    } else {
        path.to_path_buf()
    };
    debug!("Loading manifest {}", path.display());
    Manifest::load(&path)
}

/// Resolve caller options into a validated [`Config`].
///
/// # Errors
///
/// - [`AutoplugError::InvalidOptions`] when there is neither a non-empty
///   prefix nor an explicit pattern list and replace expression
/// - [`AutoplugError::ManifestNotFound`] when no manifest was given and none
///   was discovered, or the document is not a mapping
/// - [`AutoplugError::ManifestLoadError`] when the manifest path cannot be
///   read or parsed
/// - [`AutoplugError::InvalidPattern`] for malformed glob syntax
///
/// # Examples
///
/// ```rust
/// use autoplug::manifest::Manifest;
/// use autoplug::options::{Options, resolve};
///
/// # fn example() -> anyhow::Result<()> {
/// let options: Options<()> = Options::new().prefix("gulp").manifest(Manifest::new());
/// let config = resolve(options)?;
///
/// assert_eq!(config.pattern(), ["gulp-*", "gulp.*", "!autoplug"]);
/// assert_eq!(config.replace_expression().as_str(), "^gulp([.-])");
/// assert_eq!(config.scope(), ["dependencies", "devDependencies"]);
/// # Ok(())
/// # }
/// ```
pub fn resolve<T>(options: Options<T>) -> Result<Config<T>>
where
    T: Clone + Send + 'static,
{
    let mut raw = options.into_values();
    let mut resolution = Resolution::new();

    for name in OptionName::RESOLUTION_ORDER {
        resolution.resolve_option(name, raw.remove(&name))?;
    }

    resolution.check_validity()?;
    debug!(
        "Resolved options with {} explicit value(s): {:?}",
        resolution.explicit.len(),
        resolution.explicit
    );
    resolution.into_config()
}
