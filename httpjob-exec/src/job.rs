use std::sync::Arc;
use std::time::Instant;

use httpjob_core::{verdict, ConfigError, JobConfig, Props, Timeouts};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::executor::{execute, ExecutionError};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::poll::{PollFailure, PollOutcome, Poller};
use crate::request::build_request;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("Job execute failed: status {status} response did not satisfy successEval/failEval")]
    Rejected { status: u16 },
    #[error("status check failed after {attempts} attempts: {reason}")]
    PollFailed { attempts: u32, reason: PollFailure },
    #[error("job cancelled after {attempts} status checks")]
    Cancelled { attempts: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_attempts: Option<u32>,
    pub elapsed_ms: u64,
}

/// One HTTP job: a primary call judged by `successEval`/`failEval`, then an optional
/// status poll when `status.url` is configured.
pub struct HttpJob {
    id: String,
    props: Props,
    http: Option<Arc<dyn HttpClient>>,
    cancel: CancellationToken,
}

impl HttpJob {
    pub fn new(id: impl Into<String>, props: Props) -> Self {
        Self {
            id: id.into(),
            props,
            http: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `http` for both phases instead of building a reqwest client per phase.
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Requests termination of an in-progress (or upcoming) status poll.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(&self) -> Result<JobReport, JobError> {
        let span = tracing::info_span!("http_job", job_id = %self.id);
        let started = Instant::now();
        let result = self.run_phases(started).instrument(span.clone()).await;
        span.in_scope(|| {
            tracing::info!(
                "HTTP {} completed {} in {} seconds.",
                self.id,
                if result.is_ok() { "successfully" } else { "unsuccessfully" },
                started.elapsed().as_secs()
            )
        });
        result
    }

    async fn run_phases(&self, started: Instant) -> Result<JobReport, JobError> {
        let config = JobConfig::from_props(&self.props)?;

        let http = self.client_for(&config.request.timeouts)?;
        let resp = execute(http.as_ref(), build_request(&config.request)).await?;

        tracing::info!(
            "HTTP validate successEval: {}, failEval: {}",
            config.success_eval.as_str(),
            config.fail_eval.as_str()
        );
        if !verdict(resp.body(), &config.success_eval, &config.fail_eval) {
            return Err(JobError::Rejected { status: resp.status });
        }

        let poll_attempts = match &config.status {
            None => None,
            Some(status) => {
                let http = self.client_for(&status.request.timeouts)?;
                match Poller::new(http.as_ref(), status).run(&self.cancel).await {
                    PollOutcome::Success { attempts } => Some(attempts),
                    PollOutcome::Failed { attempts, reason } => {
                        return Err(JobError::PollFailed { attempts, reason })
                    }
                    PollOutcome::Cancelled { attempts } => {
                        return Err(JobError::Cancelled { attempts })
                    }
                }
            }
        };

        Ok(JobReport {
            job_id: self.id.clone(),
            status_code: resp.status,
            poll_attempts,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn client_for(&self, timeouts: &Timeouts) -> Result<Arc<dyn HttpClient>, ExecutionError> {
        match &self.http {
            Some(http) => Ok(http.clone()),
            None => Ok(Arc::new(ReqwestHttpClient::new(timeouts)?)),
        }
    }
}
