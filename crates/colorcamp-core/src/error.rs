//! Error taxonomy shared by colors, groups, and camps.

use std::io;
use std::path::{Path, PathBuf};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CampError>;

/// Errors raised by construction, lookup, and persistence.
///
/// Every failure is reported synchronously at the point of violation.
#[derive(Debug, thiserror::Error)]
pub enum CampError {
    /// Bad construction input: out-of-range channel, malformed hex text,
    /// stop mismatch, unnamed member in a keyed registry.
    #[error("invalid value: {0}")]
    Validation(String),

    /// A file, camp, or registry entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate name without overwrite, or an existing file on save.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A persisted file is not valid JSON for the expected record.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record parsed as JSON but its content is unusable.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Any other I/O failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CampError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub(crate) fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Map an I/O error, promoting `NotFound` into the domain variant.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::not_found(format!("file {}", path.display()))
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// True for both malformed JSON and well-formed but unusable records.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::InvalidRecord(_))
    }
}
