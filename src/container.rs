//! The result container returned to callers.
//!
//! A [`Container`] maps derived property names to [`Binding`]s, in the order
//! the matched dependencies were scanned. A binding is either a value loaded
//! while the container was built ([`Binding::Eager`]) or a deferred load
//! that runs the loader on every access ([`Binding::Lazy`]). Whether a
//! repeated lazy access is cheap is up to the loader; a
//! [`ModuleRegistry`](crate::loader::ModuleRegistry) caches, a plain closure
//! does not.

use crate::core::AutoplugError;
use crate::loader::Loader;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// How one plugin is held by the container.
pub enum Binding<T> {
    /// Loaded while the container was built
    Eager(T),
    /// Loaded from `module` through `loader` on each access
    Lazy {
        /// Original dependency name passed to the loader
        module: String,
        /// Loader captured from the resolved options
        loader: Arc<dyn Loader<T>>,
    },
}

impl<T: Clone> Binding<T> {
    /// Produce the bound value, invoking the loader for lazy bindings.
    ///
    /// # Errors
    ///
    /// Lazy bindings return the loader's error unchanged.
    pub fn value(&self) -> Result<T> {
        match self {
            Self::Eager(value) => Ok(value.clone()),
            Self::Lazy {
                module,
                loader,
            } => {
                debug!("Loading '{}' on access", module);
                loader.load(module)
            }
        }
    }
}

impl<T> Binding<T> {
    /// Whether the value is only loaded when accessed.
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy { .. })
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(value) => f.debug_tuple("Eager").field(value).finish(),
            Self::Lazy {
                module,
                ..
            } => f.debug_struct("Lazy").field("module", module).finish_non_exhaustive(),
        }
    }
}

struct Entry<T> {
    key: String,
    module: String,
    binding: Binding<T>,
}

/// Plugins bound under their derived property names.
///
/// # Examples
///
/// ```rust
/// use autoplug::manifest::Manifest;
/// use autoplug::options::Options;
///
/// # fn example() -> anyhow::Result<()> {
/// let manifest = Manifest::new()
///     .with_section("dependencies", [("t-foo", "1.0.0"), ("t-bar-baz", "*")]);
/// let options = Options::new()
///     .prefix("t")
///     .manifest(manifest)
///     .loader(|name: &str| Ok(name.len()));
///
/// let plugins = autoplug::load(options)?;
/// assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["foo", "barBaz"]);
/// assert_eq!(plugins.load("barBaz")?, 9);
/// # Ok(())
/// # }
/// ```
pub struct Container<T> {
    entries: Vec<Entry<T>>,
    index: HashMap<String, usize>,
}

impl<T> Container<T> {
    /// An empty container.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Bind `module` under `key`.
    ///
    /// Binding an existing key replaces the earlier binding; the key keeps
    /// its original position.
    pub fn insert(&mut self, key: impl Into<String>, module: impl Into<String>, binding: Binding<T>) {
        let key = key.into();
        let module = module.into();
        match self.index.get(&key).copied() {
            Some(position) => {
                let existing = &mut self.entries[position];
                warn!(
                    "'{}' and '{}' both map to '{}'; keeping '{}'",
                    existing.module, module, key, module
                );
                existing.module = module;
                existing.binding = binding;
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(Entry {
                    key,
                    module,
                    binding,
                });
            }
        }
    }

    /// The binding held under `key`.
    pub fn get(&self, key: &str) -> Option<&Binding<T>> {
        self.index.get(key).map(|&position| &self.entries[position].binding)
    }

    /// The original dependency name bound under `key`.
    pub fn module_name(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&position| self.entries[position].module.as_str())
    }

    /// Whether a plugin is bound under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Property names in binding order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// `(property name, binding)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding<T>)> {
        self.entries.iter().map(|entry| (entry.key.as_str(), &entry.binding))
    }

    /// Number of bound plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no plugin matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Container<T> {
    /// Produce the plugin bound under `key`.
    ///
    /// # Errors
    ///
    /// [`AutoplugError::PluginNotFound`] when nothing is bound under `key`;
    /// otherwise whatever the loader returns for lazy bindings.
    pub fn load(&self, key: &str) -> Result<T> {
        let binding = self.get(key).ok_or_else(|| AutoplugError::PluginNotFound {
            name: key.to_string(),
        })?;
        binding.value()
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
