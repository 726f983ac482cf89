//! Core types for autoplug
//!
//! Error handling shared by every stage of the pipeline:
//! - [`AutoplugError`] - enumerated failure modes
//! - [`ErrorContext`] / [`user_friendly_error`] - user-facing reporting with suggestions
//! - [`file_error`] - file access errors that remember why a file was being read
//!
//! # Examples
//!
//! ```rust
//! use autoplug::core::AutoplugError;
//!
//! fn example() -> anyhow::Result<()> {
//!     Err(AutoplugError::ManifestNotFound {
//!         file: "package.json".to_string(),
//!     }
//!     .into())
//! }
//!
//! let err = example().unwrap_err();
//! assert!(matches!(
//!     err.downcast_ref::<AutoplugError>(),
//!     Some(AutoplugError::ManifestNotFound { .. })
//! ));
//! ```

pub mod error;
pub mod file_error;

pub use error::{AutoplugError, ErrorContext, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
