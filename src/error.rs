//! Error type for odd-even sort runs.
//!
//! Configuration problems and thread creation failures are reported before
//! any worker touches the sequence, so a caller that gets one of those back
//! still holds its input exactly as it passed it in.

use thiserror::Error;

/// Errors reported by [`crate::sort`] and [`crate::sort_with_config`].
#[derive(Debug, Error)]
pub enum SortError {
    /// The worker or round configuration cannot drive a sort.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// The worker threads could not be created.
    #[error("failed to start worker threads: {0}")]
    WorkerSpawn(#[source] rayon::ThreadPoolBuildError),

    /// A worker panicked inside its round loop.
    #[error("worker failed during the round loop: {message}")]
    WorkerFailure {
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl SortError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SortError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Returns true for [`SortError::InvalidConfiguration`].
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, SortError::InvalidConfiguration { .. })
    }
}
