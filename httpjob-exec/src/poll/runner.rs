use httpjob_core::StatusConfig;
use tokio_util::sync::CancellationToken;

use crate::executor::{execute, ExecutionError, ResponseOutcome};
use crate::http::HttpClient;
use crate::poll::state::{AttemptResult, PollOutcome, PollState, PollStep};
use crate::request::build_request;

/// Repeats the status request every `interval` until an expression matches, the error
/// budget runs out, or the token is cancelled. There is no overall deadline.
pub struct Poller<'a> {
    http: &'a dyn HttpClient,
    cfg: &'a StatusConfig,
}

impl<'a> Poller<'a> {
    pub fn new(http: &'a dyn HttpClient, cfg: &'a StatusConfig) -> Self {
        Self { http, cfg }
    }

    pub async fn run(&self, cancel: &CancellationToken) -> PollOutcome {
        let mut state = PollState::new(self.cfg.interval, self.cfg.max_retries);
        tracing::info!(
            "HTTP check status interval: {}ms, successEval: {}, failEval: {}",
            self.cfg.interval.as_millis(),
            self.cfg.success_eval.as_str(),
            self.cfg.fail_eval.as_str()
        );
        let req = build_request(&self.cfg.request);
        state.start();

        loop {
            if cancel.is_cancelled() {
                return state.cancel();
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return state.cancel(),
                _ = tokio::time::sleep(state.interval) => {}
            }

            // An in-flight request is abandoned on cancel.
            let sent = tokio::select! {
                biased;
                _ = cancel.cancelled() => return state.cancel(),
                r = execute(self.http, req.clone()) => r,
            };

            let step = state.record(self.judge(sent));
            tracing::info!("HTTP job status checked {} times", state.attempts());
            if let PollStep::Resolve(outcome) = step {
                return outcome;
            }
        }
    }

    fn judge(&self, sent: Result<ResponseOutcome, ExecutionError>) -> AttemptResult {
        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                match &e {
                    ExecutionError::Status { body: Some(body), .. } => {
                        tracing::info!("HTTP job status check error: {e}, response [{body}]")
                    }
                    _ => tracing::info!("HTTP job status check error: {e}"),
                }
                return AttemptResult::TransportError(e.to_string());
            }
        };

        let body = resp.body();
        if !self.cfg.fail_eval.is_empty() && self.cfg.fail_eval.matches(body) {
            tracing::info!("HTTP job status check response [{}]", body.unwrap_or(""));
            return AttemptResult::FailMatched;
        }
        if self.cfg.success_eval.matches(body) {
            tracing::info!("HTTP job status check response [{}]", body.unwrap_or(""));
            return AttemptResult::SuccessMatched;
        }
        AttemptResult::Pending
    }
}
