//! Error types for the collection compiler.
//!
//! Every failure is fatal to the current invocation: the artifact must
//! represent a complete, coherent collection or nothing, so there is no
//! per-record skip-and-continue. Each variant carries the offending path
//! and field context so the source record can be fixed directly.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkcError>;

#[derive(Debug, Error)]
pub enum SkcError {
    #[error("records directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("no record files (*.json) found under {}", .0.display())]
    EmptyCollection(PathBuf),

    #[error("invalid collection metadata {}: {reason}", path.display())]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("malformed record {}: {reason}", path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("record {}: missing required field(s): {fields}", path.display())]
    MissingField { path: PathBuf, fields: String },

    #[error("record {}: {field} is {actual:?}, expected {expected:?}", path.display())]
    TypeMismatch {
        path: PathBuf,
        field: String,
        actual: String,
        expected: String,
    },

    #[error(
        "record {}: isMemberOf {actual:?} does not match collection {expected:?}",
        path.display()
    )]
    MembershipMismatch {
        path: PathBuf,
        actual: String,
        expected: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "artifact {} is out of date with its sources; rerun with --write to regenerate",
        .0.display()
    )]
    StaleArtifact(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SkcError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for robot-mode output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDirectory(_) => "missing_directory",
            Self::EmptyCollection(_) => "empty_collection",
            Self::InvalidMetadata { .. } => "invalid_metadata",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::MissingField { .. } => "missing_field",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::MembershipMismatch { .. } => "membership_mismatch",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::StaleArtifact(_) => "stale_artifact",
            Self::Io { .. } => "io_failure",
        }
    }
}
