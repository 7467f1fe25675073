//! Error types shared across the lossbook crates.

use std::path::Path;

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures originating in the persistence layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not open or reach the database file.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A statement failed to execute.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migrations could not be applied.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Anything else the storage backend reports.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors surfaced by repositories and pipelines.
#[derive(Debug, Error)]
pub enum Error {
    /// Store unreachable or a statement failed.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A file or record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input (bad line, empty file).
    #[error("Invalid format: {0}")]
    Format(String),

    /// The destination cannot be written.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// A rejected entry payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Residual I/O failure not covered by the variants above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify an I/O error raised while reading `path`.
    pub fn read_io(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(format!("{}", path.display())),
            std::io::ErrorKind::PermissionDenied => {
                Self::Permission(format!("cannot read {}", path.display()))
            }
            _ => Self::Io(err),
        }
    }

    /// Classify an I/O error raised while writing `path`.
    pub fn write_io(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::Permission(format!(
                "cannot write {} (check the export directory permissions)",
                path.display()
            )),
            _ => Self::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_writes_are_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::write_io(io, Path::new("/exports/reason01"));
        assert!(matches!(err, Error::Permission(_)));
        assert!(err.to_string().contains("/exports/reason01"));
    }

    #[test]
    fn missing_files_map_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err = Error::read_io(io, Path::new("/imports/missing.txt"));
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn other_io_errors_pass_through() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            Error::read_io(io, Path::new("/tmp/x")),
            Error::Io(_)
        ));
    }
}
