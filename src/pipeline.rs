//! The plugin-loading pipeline.
//!
//! An invocation runs in four stages over a resolved [`Config`]:
//!
//! 1. scan the manifest sections named by `scope` for dependency names;
//! 2. keep the names passing the pattern list;
//! 3. derive each kept name's property name;
//! 4. bind the module under that name, loading it now (eager) or deferring
//!    the load to the first access (lazy).
//!
//! [`AutoPlug`] keeps the caller's raw options so they can be amended with
//! [`set_options`](AutoPlug::set_options) before the container is built.

use crate::container::{Binding, Container};
use crate::options::{Config, Options, OptionsInput, resolve};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Staged plugin loading.
///
/// # Examples
///
/// ```rust
/// use autoplug::AutoPlug;
/// use autoplug::manifest::Manifest;
/// use autoplug::options::Options;
///
/// # fn example() -> anyhow::Result<()> {
/// let manifest = Manifest::new()
///     .with_section("dependencies", [("gulp-foo", "1"), ("jack-foo", "1")]);
/// let mut plug = AutoPlug::new(
///     Options::new()
///         .prefix("gulp")
///         .manifest(manifest)
///         .loader(|name: &str| Ok(name.to_string())),
/// )?;
/// assert_eq!(plug.matched_names(), vec!["gulp-foo"]);
///
/// plug.set_options("jack")?;
/// let plugins = plug.into_container()?;
/// assert_eq!(plugins.load("foo")?, "jack-foo");
/// # Ok(())
/// # }
/// ```
pub struct AutoPlug<T> {
    options: Options<T>,
    config: Config<T>,
}

impl<T> AutoPlug<T>
where
    T: Clone + Send + 'static,
{
    /// Resolve `input` into a configuration.
    ///
    /// # Errors
    ///
    /// Any resolution error; see [`resolve`].
    pub fn new(input: impl Into<OptionsInput<T>>) -> Result<Self> {
        let options = input.into().into_options();
        let config = resolve(options.clone())?;
        Ok(Self {
            options,
            config,
        })
    }

    /// Merge more options over the current ones and resolve again.
    ///
    /// A new valid `prefix` resets `pattern` and `replace_expression`, and a
    /// new valid `host` resets `manifest` and `loader`, unless the same call
    /// supplies them. On error the previous configuration is kept.
    pub fn set_options(&mut self, input: impl Into<OptionsInput<T>>) -> Result<&mut Self> {
        let mut options = self.options.clone();
        options.merge(input.into().into_options());
        let config = resolve(options.clone())?;

        self.options = options;
        self.config = config;
        Ok(self)
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config<T> {
        &self.config
    }

    /// The raw options the configuration was resolved from.
    pub fn options(&self) -> &Options<T> {
        &self.options
    }

    /// Dependency names that pass the filter, in scan order.
    pub fn matched_names(&self) -> Vec<String> {
        let candidates = self.config.manifest().scan(self.config.scope());
        debug!("Scanned {} dependency name(s) in {:?}", candidates.len(), self.config.scope());
        self.config.filter().filter(&candidates)
    }

    /// Build the container.
    ///
    /// # Errors
    ///
    /// In eager mode the first loader error is returned unchanged and no
    /// container is built. Lazy mode does not fail here.
    pub fn plug(&self) -> Result<Container<T>> {
        let transformer = self.config.transformer();
        let lazy = self.config.lazy();
        let mut container = Container::new();

        for module in self.matched_names() {
            let key = transformer.property_name(&module);
            let binding = if lazy {
                Binding::Lazy {
                    module: module.clone(),
                    loader: Arc::clone(self.config.loader()),
                }
            } else {
                debug!("Loading '{}' as '{}'", module, key);
                Binding::Eager(self.config.loader().load(&module)?)
            };
            container.insert(key, module, binding);
        }

        debug!("Bound {} plugin(s){}", container.len(), if lazy { " lazily" } else { "" });
        Ok(container)
    }

    /// Same as [`plug`](Self::plug).
    pub fn container(&self) -> Result<Container<T>> {
        self.plug()
    }

    /// Build the container, consuming the pipeline.
    pub fn into_container(self) -> Result<Container<T>> {
        self.plug()
    }
}

/// Discover, filter and bind plugins in one call.
///
/// `input` may be a prefix string, an [`Options`] value, or `()` for all
/// defaults (which fails validation, since no prefix is set).
///
/// # Errors
///
/// Resolution errors, plus the first loader error in eager mode.
pub fn load<T>(input: impl Into<OptionsInput<T>>) -> Result<Container<T>>
where
    T: Clone + Send + 'static,
{
    AutoPlug::new(input)?.into_container()
}
