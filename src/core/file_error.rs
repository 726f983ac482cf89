//! Structured file system error handling for autoplug
//!
//! Captures context at the operation site (what was being read, and why)
//! rather than parsing error messages after the fact.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations autoplug performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Resolving the current working directory
    CurrentDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::CurrentDir => write!(f, "resolving working directory"),
        }
    }
}

/// File operation error with the purpose of the access attached
#[derive(Error, Debug)]
#[error("Failed {operation} '{}' for {purpose}", .file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Get a user-friendly error message with a hint for common IO failures
    pub fn user_message(&self) -> String {
        let mut message = self.to_string();
        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str(": the file does not exist at the specified path");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(": permission denied");
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str(": the file is not valid UTF-8 text");
            }
            _ => {
                message.push_str(&format!(": {}", self.source));
            }
        }
        message
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            source,
        })
    }
}

/// Read a UTF-8 file, attaching the purpose of the read to any failure
pub fn read_to_string_with_context(
    path: &Path,
    purpose: &str,
) -> Result<String, FileOperationError> {
    std::fs::read_to_string(path).with_file_context(FileOperation::Read, path, purpose)
}
