//! autoplug - automatic plugin loading for build-tool ecosystems
//!
//! Tools such as task runners grow an ecosystem of plugins published as
//! ordinary packages that share a naming convention (`taskrunner-lint`,
//! `taskrunner-test`, ...). autoplug reads the project's dependency
//! manifest, picks out the packages matching the convention and hands back
//! a container keyed by short property names (`lint`, `test`), loading each
//! module through a caller-supplied [`Loader`].
//!
//! # Architecture Overview
//!
//! An invocation is one synchronous pass:
//!
//! 1. [`options`] - caller options are checked against the accepted kinds,
//!    defaults are derived (the pattern list and the prefix-stripping
//!    expression come from the prefix) and the manifest is located;
//! 2. [`manifest`] - the sections named by `scope` are scanned for names;
//! 3. [`pattern`] - glob include/exclude rules select the plugins;
//! 4. [`naming`] - each plugin gets its property name;
//! 5. [`container`] - modules are bound eagerly or lazily.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use autoplug::loader::Host;
//! use autoplug::options::Options;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Modules the host knows how to build, by package name.
//! let host = Host::current()?;
//! host.registry().register("taskrunner-code-lint", || Ok("lint task".to_string()));
//!
//! // Finds package.json upward from the working directory.
//! let plugins = autoplug::load(Options::new().prefix("taskrunner").host(host))?;
//! for name in plugins.keys() {
//!     println!("{name}: {}", plugins.load(name)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A bare prefix is accepted as shorthand; the module registry of the
//! default host is empty, so a custom loader is usually given as well:
//!
//! ```rust,no_run
//! # fn main() -> anyhow::Result<()> {
//! let plugins: autoplug::Container<String> = autoplug::load("taskrunner")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Manifest Formats
//!
//! `package.json` is searched for by default. Manifests may also be TOML or
//! YAML (chosen by file extension), so a `Cargo.toml` works too:
//!
//! ```toml
//! [dependencies]
//! taskrunner-lint = "1.2"
//! taskrunner-test = { version = "0.4", features = ["junit"] }
//! ```
//!
//! # Error Handling
//!
//! Functions return [`anyhow::Result`] carrying an [`AutoplugError`] that
//! callers can `downcast_ref`. Errors from the loader are passed through
//! untouched. [`user_friendly_error`](crate::core::user_friendly_error) turns any error into a message
//! with a suggestion for display in a terminal.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`debug` for resolution decisions,
//! `trace` for per-name filter decisions, `warn` for property-name
//! collisions) and never installs a subscriber itself.

pub mod constants;
pub mod container;
pub mod core;
pub mod loader;
pub mod manifest;
pub mod naming;
pub mod options;
pub mod pattern;
pub mod pipeline;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use container::{Binding, Container};
pub use crate::core::AutoplugError;
pub use loader::{Host, Loader, ModuleRegistry};
pub use options::{Options, OptionsInput};
pub use pipeline::{AutoPlug, load};
