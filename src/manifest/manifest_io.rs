//! Reading structured documents from disk.
//!
//! Manifests and options files share one loader: the file extension picks
//! the format and the result is a [`serde_json::Value`] so callers can
//! inspect any of them the same way.

use crate::core::AutoplugError;
use crate::core::file_error::read_to_string_with_context;
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Structured-data formats understood by [`load_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`, and any unrecognized extension
    Json,
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "toml" => Self::Toml,
            Some(ext) if ext == "yaml" || ext == "yml" => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Parse `content` in this format.
    pub fn parse(self, content: &str) -> Result<Value> {
        let value = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(value)
    }
}

/// Read and parse a structured document.
///
/// # Errors
///
/// Any read or parse failure is reported as
/// [`AutoplugError::ManifestLoadError`] naming the offending path.
pub fn load_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path);
    debug!("Loading {:?} document from {}", format, path.display());

    let load_error = |reason: String| AutoplugError::ManifestLoadError {
        path: path.display().to_string(),
        reason,
    };

    let content = read_to_string_with_context(path, "loading dependency manifest")
        .map_err(|e| load_error(e.user_message()))?;
    let value = format.parse(&content).map_err(|e| load_error(e.to_string()))?;
    Ok(value)
}
