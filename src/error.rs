use std::time::Duration;

use thiserror::Error;

/// Failure of a single upstream fetch. These never escape an aggregation
/// cycle as a panic or early return; the engine records them as per-source
/// outcomes and carries on with the healthy sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
