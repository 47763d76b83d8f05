//! Drover HTTP Client
//!
//! A type-safe client for a remote job-orchestration service: submit
//! fact-gathering jobs and ad-hoc tasks, fetch job status, and block
//! until a submitted job reaches a terminal state.
//!
//! The client manages exactly one job per call. It holds no shared
//! mutable state between calls, so independent waits on different job
//! identifiers can run concurrently without coordination.
//!
//! # Example
//!
//! ```no_run
//! use drover_client::OrchestratorClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OrchestratorClient::new("https://console.example:8143");
//!
//!     let response = client.submit_facts_job(&["web01.example".to_string()]).await?;
//!     let job_id = OrchestratorClient::extract_job_id(&response)?;
//!
//!     let report = client.wait_until_finished(&job_id).await?;
//!     println!("job {job_id} finished with {} status entries", report.status.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
pub mod transport;
mod wait;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::{JOBS_ENDPOINT, TASK_ENDPOINT};
pub use transport::{ApiResponse, Auth, HttpTransport, Transport};
pub use wait::{
    CancelHandle, CancelToken, CompletionPolicy, PollAttempt, TracingObserver, WaitObserver,
    WaitOptions, cancellation,
};

use std::sync::Arc;

/// Client for the job-orchestration service
///
/// Operations are grouped into:
/// - Job submission (facts jobs, arbitrary task invocations)
/// - Job retrieval (listing, per-job status with pagination)
/// - Completion waiting (the polling state machine in [`WaitOptions`])
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    transport: Arc<dyn Transport>,
}

impl OrchestratorClient {
    /// Create a client against the service's base URL
    ///
    /// # Example
    /// ```
    /// use drover_client::OrchestratorClient;
    ///
    /// let client = OrchestratorClient::new("https://console.example:8143");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(base_url)))
    }

    /// Create a client over an explicit transport
    ///
    /// Use this to attach credentials or a custom TLS configuration via
    /// [`HttpTransport`], or to substitute a mock transport in tests.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}
