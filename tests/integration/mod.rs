//! Integration test suite for autoplug
//!
//! End-to-end checks of the public API against manifests on disk.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **end_to_end**: prefix-driven loading, naming and filtering
//! - **lazy_loading**: lazy vs eager binding and loader errors
//! - **manifest_discovery**: ancestor search, formats and missing manifests
//! - **options_merge**: re-merging options on a staged pipeline
//! - **options_file**: declarative options files

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod end_to_end;
mod lazy_loading;
mod manifest_discovery;
mod options_file;
mod options_merge;
