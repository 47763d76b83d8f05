//! Error types for the drover client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the orchestration service
///
/// The client performs no local recovery or retry: every error is
/// surfaced to the caller with enough context (job identifier, offending
/// field) to log or retry at a higher layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller supplied a malformed request; detected before any network call
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network/HTTP-layer failure, propagated unchanged
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body did not match the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service no longer knows the job identifier
    #[error("job {job_id} not found")]
    JobNotFound { job_id: String },

    /// An external cancellation signal fired while waiting
    #[error("wait for job {job_id} cancelled after {attempts} poll(s)")]
    Cancelled { job_id: String, attempts: u32 },

    /// A configured deadline elapsed or the poll budget ran out
    #[error("timed out waiting for job {job_id} after {attempts} poll(s)")]
    Timeout { job_id: String, attempts: u32 },
}

impl ClientError {
    /// Check if this error means the job is unknown to the service
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::JobNotFound { .. })
    }

    /// Check if this error ended a wait without a service-side verdict
    pub fn is_wait_aborted(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::Timeout { .. })
    }
}
