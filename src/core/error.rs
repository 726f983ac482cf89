//! Error handling for autoplug
//!
//! This module provides the error types raised while resolving options,
//! locating manifests and binding plugins, plus user-friendly reporting for
//! tools that embed the crate. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for terminal users
//!
//! # Architecture
//!
//! - [`AutoplugError`] - Enumerated error types for every failure autoplug raises itself
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! Public functions return [`anyhow::Result`] carrying an [`AutoplugError`],
//! so callers can `downcast_ref::<AutoplugError>()` to branch on the failure.
//! Errors produced by a caller's [`Loader`](crate::loader::Loader) are never
//! wrapped: they reach the caller exactly as the loader returned them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use autoplug::core::{AutoplugError, user_friendly_error};
//!
//! let error = anyhow::Error::from(AutoplugError::ManifestNotFound {
//!     file: "package.json".to_string(),
//! });
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for autoplug operations.
///
/// Variants map to the failure classes of a single invocation:
/// option validity, manifest resolution, pattern compilation and
/// container lookups.
#[derive(Error, Debug, Clone)]
pub enum AutoplugError {
    /// Neither a usable prefix nor an explicit pattern/replace-expression pair was given
    ///
    /// Raised before any manifest lookup or scanning happens.
    ///
    /// # Fields
    /// - `invalid`: the option names that failed validation
    #[error("autoplug options are not valid: {}", .invalid.join(", "))]
    InvalidOptions {
        /// Names of the options that failed validation
        invalid: Vec<String>,
    },

    /// The manifest was given as a path that cannot be read or parsed
    #[error("Could not load the given manifest file: '{path}'")]
    ManifestLoadError {
        /// Path of the manifest file
        path: String,
        /// Reason the file could not be loaded
        reason: String,
    },

    /// No dependency manifest could be resolved from any source
    ///
    /// Occurs when no manifest was supplied, discovery walked to the
    /// filesystem root without finding one, or the loaded document is not a
    /// mapping of sections.
    #[error("Could not find dependencies. Do you have a {file} file in your project?")]
    ManifestNotFound {
        /// Conventional manifest filename that was searched for
        file: String,
    },

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern, as supplied
        pattern: String,
        /// Compiler message from the glob engine
        reason: String,
    },

    /// A container key was requested that no plugin was bound under
    #[error("No plugin is bound under '{name}'")]
    PluginNotFound {
        /// The property name that was looked up
        name: String,
    },

    /// The host module registry has no module registered under a name
    #[error("Cannot find module '{name}'")]
    ModuleNotFound {
        /// The module (dependency) name that was requested
        name: String,
    },

    /// An options file was malformed
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl From<std::io::Error> for AutoplugError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` pairs an [`AutoplugError`] with optional details and a
/// suggestion. Embedding tools call [`ErrorContext::display`] to print it.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying autoplug error
    pub error: AutoplugError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from an [`AutoplugError`]
    #[must_use]
    pub const fn new(error: AutoplugError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`AutoplugError`] variants and [`std::io::Error`]; anything else
/// (typically an error returned by a plugin loader) is reported with its full
/// cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(autoplug_error) = error.downcast_ref::<AutoplugError>() {
        return create_error_context(autoplug_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(AutoplugError::Io(io_error.to_string()))
                .with_suggestion("Check the permissions of the project directory and its manifest");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(AutoplugError::Other {
        message,
    })
}

fn create_error_context(error: AutoplugError) -> ErrorContext {
    match &error {
        AutoplugError::InvalidOptions {
            ..
        } => ErrorContext::new(error)
            .with_details("A prefix is needed to derive the match pattern and the name-stripping expression")
            .with_suggestion(
                "Pass a non-empty prefix, e.g. autoplug::load(\"taskrunner\"), or set both `pattern` and `replace_expression`",
            ),
        AutoplugError::ManifestLoadError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check that the manifest path exists and contains valid JSON, TOML or YAML")
        }
        AutoplugError::ManifestNotFound {
            file,
        } => {
            let details = format!(
                "autoplug searches for {file} starting at the host directory and walking up to the filesystem root"
            );
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Run from inside your project, set the host directory, or pass the manifest explicitly")
        }
        AutoplugError::InvalidPattern {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check for unbalanced brackets in the pattern list"),
        AutoplugError::PluginNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("List the available plugins with Container::keys()"),
        AutoplugError::ModuleNotFound {
            name,
        } => {
            let suggestion = format!("Register '{name}' with the host ModuleRegistry or supply a custom loader");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        _ => ErrorContext::new(error),
    }
}
