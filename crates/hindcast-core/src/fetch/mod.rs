//! Idempotent fetch of one archive file.
//!
//! `fetch` is a no-op when the destination already exists; otherwise it runs a
//! streaming GET into a staged temp file. Every call, whatever the outcome,
//! counts as one completed operation on the shared [`ProgressCounter`].

mod error;
mod transfer;

pub use error::{FailureKind, FetchError};

use std::sync::Arc;

use crate::catalog::DownloadRequest;
use crate::config::HttpConfig;
use crate::scheduler::ProgressCounter;

/// What happened to one request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body streamed to disk; `bytes` written.
    Downloaded { bytes: u64 },
    /// Destination already existed; no network call was made.
    Skipped,
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// Per-worker fetch handle. Cheap to clone; clones share the counter and signal channel.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: HttpConfig,
    progress: Arc<ProgressCounter>,
    signal: Option<tokio::sync::mpsc::Sender<()>>,
}

impl Fetcher {
    pub fn new(http: HttpConfig, progress: Arc<ProgressCounter>) -> Self {
        Self {
            http,
            progress,
            signal: None,
        }
    }

    /// Also notify a reporter after each completed fetch (non-blocking; a full channel drops the signal).
    pub fn with_signal(mut self, signal: tokio::sync::mpsc::Sender<()>) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Fetches `request` unless its destination exists. Blocking; never panics on I/O or HTTP errors.
    pub fn fetch(&self, request: &DownloadRequest) -> FetchOutcome {
        let outcome = if request.destination.exists() {
            tracing::trace!(path = %request.destination.display(), "already present, skipping");
            FetchOutcome::Skipped
        } else {
            match transfer::get_to_file(&request.url, &request.destination, &self.http) {
                Ok(bytes) => {
                    tracing::debug!(url = %request.url, bytes, "downloaded");
                    FetchOutcome::Downloaded { bytes }
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, kind = ?e.kind(), "fetch failed: {}", e);
                    FetchOutcome::Failed(e)
                }
            }
        };
        self.progress.record(&request.url, &outcome);
        if let Some(tx) = &self.signal {
            let _ = tx.try_send(());
        }
        outcome
    }
}
