//! Module loading seam.
//!
//! autoplug never resolves modules itself. It hands each matched dependency
//! name to a [`Loader`], which turns the name into a value of the caller's
//! choosing (a plugin handle, a trait object, a function table).
//!
//! Two implementations ship with the crate:
//!
//! - any `Fn(&str) -> anyhow::Result<T>` closure, through a blanket impl;
//! - [`ModuleRegistry`], the host's own module facility: factories registered
//!   by name, instantiated on first load and cached for every later load.
//!
//! [`Host`] describes the embedding caller: the directory manifest discovery
//! starts from and the registry that backs the default loader.

use crate::core::{AutoplugError, FileOperation, FileResultExt};
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Resolves a dependency name into its module value.
///
/// Errors are returned to the caller unchanged: at construction time in
/// eager mode, or from the accessing call in lazy mode.
pub trait Loader<T>: Send + Sync {
    /// Load the module registered under `name`.
    fn load(&self, name: &str) -> Result<T>;
}

impl<T, F> Loader<T> for F
where
    F: Fn(&str) -> Result<T> + Send + Sync,
{
    fn load(&self, name: &str) -> Result<T> {
        self(name)
    }
}

type Factory<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;

/// Name-indexed module factories with a per-registry instance cache.
///
/// The first [`load`](Loader::load) of a name runs its factory; later loads
/// return a clone of the cached instance. Concurrent first loads of one name
/// run its factory once; the other callers wait and share the result. A
/// failed factory call is not cached, so the next load retries it.
///
/// # Examples
///
/// ```rust
/// use autoplug::loader::{Loader, ModuleRegistry};
///
/// let registry = ModuleRegistry::new();
/// registry.register("taskrunner-lint", || Ok("lint".to_string()));
///
/// assert_eq!(registry.load("taskrunner-lint").unwrap(), "lint");
/// assert!(registry.load("taskrunner-missing").is_err());
/// ```
pub struct ModuleRegistry<T> {
    factories: Mutex<HashMap<String, Arc<Factory<T>>>>,
    cache: Mutex<HashMap<String, T>>,
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<T> ModuleRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Mutex::new(HashMap::new()),
            cache: Mutex::new(HashMap::new()),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Register a factory under a module name, replacing any earlier one.
    ///
    /// Replacing a factory drops the cached instance for that name.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering module '{}'", name);
        lock(&self.cache).remove(&name);
        lock(&self.factories).insert(name, Arc::new(Box::new(factory)));
    }

    /// Register an already-built value under a module name.
    pub fn register_value(&self, name: impl Into<String>, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.register(name, move || Ok(value.clone()));
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        lock(&self.factories).contains_key(name)
    }

    /// Whether `name` has been instantiated and cached.
    pub fn is_cached(&self, name: &str) -> bool {
        lock(&self.cache).contains_key(name)
    }

    /// Names of all registered modules, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.factories).keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T> Default for ModuleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ModuleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry").field("modules", &self.names()).finish()
    }
}

impl<T> Loader<T> for ModuleRegistry<T>
where
    T: Clone + Send,
{
    fn load(&self, name: &str) -> Result<T> {
        if let Some(cached) = lock(&self.cache).get(name) {
            trace!("Module '{}' served from cache", name);
            return Ok(cached.clone());
        }

        let factory = lock(&self.factories).get(name).cloned().ok_or_else(|| {
            AutoplugError::ModuleNotFound {
                name: name.to_string(),
            }
        })?;

        // Only this name's slot is held while the factory runs, so it may load
        // other modules.
        let slot = Arc::clone(lock(&self.slots).entry(name.to_string()).or_default());
        let _instantiating = lock(&slot);
        if let Some(cached) = lock(&self.cache).get(name) {
            trace!("Module '{}' instantiated by a concurrent load", name);
            return Ok(cached.clone());
        }

        let module = factory()?;
        debug!("Loaded module '{}'", name);
        lock(&self.cache).insert(name.to_string(), module.clone());
        Ok(module)
    }
}

fn lock<V>(mutex: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// The embedding caller of autoplug.
///
/// Manifest discovery starts at [`base_dir`](Host::base_dir), and the default
/// loader is the host's [`ModuleRegistry`]. Changing the host through
/// [`Options::host`](crate::options::Options::host) resets both the manifest
/// and the loader to the new host's defaults unless they are also given.
pub struct Host<T> {
    base_dir: PathBuf,
    registry: Arc<ModuleRegistry<T>>,
}

impl<T> Host<T> {
    /// A host rooted at `base_dir` with an empty registry.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            registry: Arc::new(ModuleRegistry::new()),
        }
    }

    /// A host rooted at the process working directory.
    pub fn current() -> Result<Self> {
        let dir = std::env::current_dir().with_file_context(
            FileOperation::CurrentDir,
            ".",
            "locating the host directory",
        )?;
        Ok(Self::new(dir))
    }

    /// Use `registry` as this host's module facility.
    pub fn with_registry(mut self, registry: Arc<ModuleRegistry<T>>) -> Self {
        self.registry = registry;
        self
    }

    /// Directory manifest discovery starts from.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The host's module registry.
    pub fn registry(&self) -> &Arc<ModuleRegistry<T>> {
        &self.registry
    }
}

impl<T> Clone for Host<T> {
    fn clone(&self) -> Self {
        Self {
            base_dir: self.base_dir.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for Host<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("base_dir", &self.base_dir)
            .field("registry", &self.registry)
            .finish()
    }
}
