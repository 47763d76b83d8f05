//! Blocking wait for job completion
//!
//! Polls a job's status until it reaches a terminal state. The loop has
//! exactly two states: polling (issue `get_job`, decide) and terminal
//! (completed, not found, cancelled, or timed out). Terminal states are
//! final; no poll is issued after one is reached.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};
use drover_core::domain::job::JobStatusReport;

/// Status message the service returns once a job identifier is no longer known.
const NOT_FOUND_MESSAGE: &str = "Not Found";

/// When a status report counts as "the job is done"
///
/// The service reports one entry per node; historically a job was
/// treated as complete as soon as any one entry finished, even with
/// other nodes still running. That policy remains the default for
/// compatibility, with the strict variant available alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Complete when at least one status entry reports "finished"
    #[default]
    AnyFinished,
    /// Complete only when the report is non-empty and every entry
    /// reports "finished"
    AllFinished,
}

impl CompletionPolicy {
    pub fn is_complete(&self, report: &JobStatusReport) -> bool {
        match self {
            Self::AnyFinished => report.any_finished(),
            Self::AllFinished => report.all_finished(),
        }
    }
}

/// One poll attempt, as delivered to a [`WaitObserver`]
#[derive(Debug, Clone)]
pub struct PollAttempt<'a> {
    pub job_id: &'a str,
    /// 1-based attempt counter
    pub attempt: u32,
    /// Time elapsed since the wait began
    pub elapsed: Duration,
}

/// Receives one event per poll attempt
///
/// Inject an implementation to surface poll progress however the caller
/// prefers; the default is [`TracingObserver`].
pub trait WaitObserver: Send + Sync {
    fn poll_attempt(&self, attempt: &PollAttempt<'_>);
}

/// Default observer: emits a `tracing` event per poll attempt
#[derive(Debug, Default)]
pub struct TracingObserver;

impl WaitObserver for TracingObserver {
    fn poll_attempt(&self, attempt: &PollAttempt<'_>) {
        debug!(
            job_id = attempt.job_id,
            attempt = attempt.attempt,
            elapsed_ms = attempt.elapsed.as_millis() as u64,
            "polled job status"
        );
    }
}

/// Create a linked cancellation handle/token pair
///
/// The handle side fires the signal; the token side is observed by the
/// polling loop between iterations. The signal travels over a watch
/// channel, so a wait started after cancellation still sees it.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Fires the cancellation signal for an in-flight wait
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes a cancellation signal
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal fires; never resolves if the handle is
    /// dropped without cancelling
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            future::pending::<()>().await;
        }
    }
}

/// Configuration for [`OrchestratorClient::wait_until_finished_with`]
pub struct WaitOptions {
    /// Delay between consecutive polls
    pub poll_interval: Duration,
    /// Give up after this many polls; `None` means unbounded
    pub max_attempts: Option<u32>,
    /// Give up once this much time has elapsed; `None` means no deadline
    pub deadline: Option<Duration>,
    /// Predicate deciding when a status report counts as complete
    pub completion: CompletionPolicy,
    /// External cancellation signal, observed between polls
    pub cancel: Option<CancelToken>,
    /// Receiver for per-poll events
    pub observer: Arc<dyn WaitObserver>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: None,
            deadline: None,
            completion: CompletionPolicy::AnyFinished,
            cancel: None,
            observer: Arc::new(TracingObserver),
        }
    }
}

impl OrchestratorClient {
    /// Wait until a job reaches a terminal state, with default options
    ///
    /// Polls every second with no attempt bound or deadline; use
    /// [`OrchestratorClient::wait_until_finished_with`] to bound the wait
    /// or attach a cancellation signal.
    pub async fn wait_until_finished(&self, job_id: &str) -> Result<JobStatusReport> {
        self.wait_until_finished_with(job_id, WaitOptions::default())
            .await
    }

    /// Wait until a job reaches a terminal state
    ///
    /// Each iteration fetches the job's status report and tests it
    /// against the completion policy. The loop ends with:
    /// - `Ok(report)` once the policy is satisfied
    /// - [`ClientError::JobNotFound`] the first time the service answers
    ///   with a "Not Found" status message
    /// - [`ClientError::MalformedResponse`] if a status body does not decode
    /// - [`ClientError::Cancelled`] once the cancellation signal fires
    /// - [`ClientError::Timeout`] once `max_attempts` or `deadline` is spent
    /// - [`ClientError::Transport`] on a network failure, propagated unchanged
    pub async fn wait_until_finished_with(
        &self,
        job_id: &str,
        options: WaitOptions,
    ) -> Result<JobStatusReport> {
        let WaitOptions {
            poll_interval,
            max_attempts,
            deadline,
            completion,
            mut cancel,
            observer,
        } = options;

        let started = Instant::now();
        let deadline = deadline.map(|d| started + d);
        let mut attempts: u32 = 0;

        debug!(job_id, "waiting for job to finish");

        loop {
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(ClientError::Cancelled {
                    job_id: job_id.to_string(),
                    attempts,
                });
            }
            if max_attempts.is_some_and(|max| attempts >= max)
                || deadline.is_some_and(|at| Instant::now() >= at)
            {
                return Err(ClientError::Timeout {
                    job_id: job_id.to_string(),
                    attempts,
                });
            }

            attempts += 1;
            let response = self.get_job(job_id, 0, 0).await?;

            observer.poll_attempt(&PollAttempt {
                job_id,
                attempt: attempts,
                elapsed: started.elapsed(),
            });

            if response.message == NOT_FOUND_MESSAGE {
                return Err(ClientError::JobNotFound {
                    job_id: job_id.to_string(),
                });
            }

            let report: JobStatusReport = serde_json::from_str(&response.body).map_err(|e| {
                ClientError::MalformedResponse(format!("status report for job {job_id}: {e}"))
            })?;

            if completion.is_complete(&report) {
                info!(job_id, attempts, "job finished");
                return Ok(report);
            }

            tokio::select! {
                biased;
                _ = cancelled_opt(&mut cancel) => {
                    return Err(ClientError::Cancelled {
                        job_id: job_id.to_string(),
                        attempts,
                    });
                }
                _ = sleep_until_opt(deadline) => {
                    return Err(ClientError::Timeout {
                        job_id: job_id.to_string(),
                        attempts,
                    });
                }
                _ = time::sleep(poll_interval) => {}
            }
        }
    }
}

async fn cancelled_opt(cancel: &mut Option<CancelToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => future::pending().await,
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => future::pending().await,
    }
}
