//! Per-file fetch errors. These never propagate past the fetcher; they are
//! logged, tallied, and returned inside [`FetchOutcome::Failed`](super::FetchOutcome).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (connect, timeout, reset, etc.).
    #[error("network: {0}")]
    Network(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating the directory, writing, or renaming the file failed.
    #[error("storage: {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse failure class used in logs and the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Filesystem,
}

impl FetchError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) | FetchError::Http(_) => FailureKind::Network,
            FetchError::Storage { .. } => FailureKind::Filesystem,
        }
    }
}
