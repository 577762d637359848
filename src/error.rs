use std::time::Duration;

use thiserror::Error;

/// Failure of a single query against the host counter source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("`{program}` failed: {detail}")]
    Command {
        program: &'static str,
        detail: String,
    },

    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
}

impl SourceError {
    pub fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        SourceError::Parse {
            what,
            detail: detail.into(),
        }
    }
}

/// Request-level failure: one sampler could not produce its part of the snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{sampler} sampler failed: {source}")]
    Sampler {
        sampler: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("{sampler} sampler timed out after {after:?}")]
    Timeout {
        sampler: &'static str,
        after: Duration,
    },

    #[error("{sampler} sampler task panicked or was cancelled")]
    Join { sampler: &'static str },
}

impl SnapshotError {
    pub fn sampler(&self) -> &'static str {
        match self {
            SnapshotError::Sampler { sampler, .. }
            | SnapshotError::Timeout { sampler, .. }
            | SnapshotError::Join { sampler } => sampler,
        }
    }
}
