//! Test utilities for autoplug
//!
//! Helpers shared by unit and integration tests:
//! - [`init_test_logging`] - tracing output for a test run
//! - [`ManifestFixture`] - a temporary project tree holding a manifest
//! - [`SpyLoader`] - a loader recording every load it performs
//!
//! # Example
//!
//! ```rust,no_run
//! use autoplug::options::Options;
//! use autoplug::loader::Host;
//! use autoplug::test_utils::{ManifestFixture, SpyLoader};
//!
//! let fixture = ManifestFixture::basic();
//! let spy = SpyLoader::new();
//! let plugins = autoplug::load(
//!     Options::new()
//!         .prefix("t")
//!         .host(Host::new(fixture.root()))
//!         .loader_arc(spy.loader()),
//! )
//! .unwrap();
//! assert_eq!(spy.calls(), 0);
//! # let _ = plugins;
//! ```

pub mod fixtures;
pub mod spy;

pub use fixtures::ManifestFixture;
pub use spy::SpyLoader;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. An explicit `level` wins; otherwise
/// `RUST_LOG` is honored, and without either nothing is installed.
///
/// ```bash
/// RUST_LOG=autoplug=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}
