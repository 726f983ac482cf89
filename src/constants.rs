//! Global constants used throughout the autoplug codebase.
//!
//! Defaults for option resolution live here so that the resolver, the
//! options-file model and the tests agree on a single source of truth.

/// Package name of this crate.
///
/// Every resolved pattern list ends with an exclusion of this name so the
/// crate never binds itself when a project happens to depend on it under a
/// matching prefix.
pub const SELF_NAME: &str = env!("CARGO_PKG_NAME");

/// Conventional manifest filename searched for during discovery.
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Manifest sections scanned when the caller gives no `scope`.
pub const DEFAULT_SCOPE: [&str; 2] = ["dependencies", "devDependencies"];

/// Version recorded for dependency entries that carry no version string.
pub const ANY_VERSION: &str = "*";

/// Returns the pattern that excludes this crate from the matched names.
pub fn self_exclusion() -> String {
    format!("!{SELF_NAME}")
}
