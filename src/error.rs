//! Error values surfaced by the filter and writer stages.
//!
//! Every failure keeps the path or key it concerns so the binary can print a
//! single line without re-deriving context.

use std::io;
use std::path::PathBuf;

/// Coarse classification of a [`FilterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorKind {
    NotFound,
    Read,
    Parse,
    MissingKey,
    TypeMismatch,
    Serialize,
    Write,
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Input path does not name an existing regular file.
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input exists but reading it failed.
    #[error("reading {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input is not valid JSON text.
    #[error("parsing JSON from {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("the '{key}' key is missing from the JSON document")]
    MissingKey { key: String },

    /// The definitions entry exists but holds something other than an object.
    #[error("the '{key}' entry must be an object, found {found}")]
    TypeMismatch { key: String, found: &'static str },

    #[error("serializing JSON document")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// Output path could not be created, truncated or written.
    #[error("writing {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    pub fn kind(&self) -> FilterErrorKind {
        match self {
            FilterError::NotFound { .. } => FilterErrorKind::NotFound,
            FilterError::Read { .. } => FilterErrorKind::Read,
            FilterError::Parse { .. } => FilterErrorKind::Parse,
            FilterError::MissingKey { .. } => FilterErrorKind::MissingKey,
            FilterError::TypeMismatch { .. } => FilterErrorKind::TypeMismatch,
            FilterError::Serialize { .. } => FilterErrorKind::Serialize,
            FilterError::Write { .. } => FilterErrorKind::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_key() {
        let err = FilterError::TypeMismatch {
            key: "definitions".to_string(),
            found: "array",
        };
        assert_eq!(err.kind(), FilterErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "the 'definitions' entry must be an object, found array"
        );

        let err = FilterError::MissingKey {
            key: "$defs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "the '$defs' key is missing from the JSON document"
        );
    }

    #[test]
    fn io_failures_keep_their_source() {
        use std::error::Error as _;

        let err = FilterError::Write {
            path: PathBuf::from("/nowhere/out.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), FilterErrorKind::Write);
        assert_eq!(err.to_string(), "writing /nowhere/out.json");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("denied"));
    }
}
