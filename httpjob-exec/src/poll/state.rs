use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Polling,
    Success,
    Failed,
    Cancelled,
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollPhase::Success | PollPhase::Failed | PollPhase::Cancelled)
    }
}

/// What one status check produced, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    TransportError(String),
    FailMatched,
    SuccessMatched,
    /// Well-formed response matching neither expression.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollFailure {
    FailMatched,
    ErrorBudgetExhausted {
        consecutive_errors: u32,
        last_error: String,
    },
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollFailure::FailMatched => write!(f, "status response matched failEval"),
            PollFailure::ErrorBudgetExhausted {
                consecutive_errors,
                last_error,
            } => write!(
                f,
                "{consecutive_errors} consecutive status check errors, last: {last_error}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success { attempts: u32 },
    Failed { attempts: u32, reason: PollFailure },
    Cancelled { attempts: u32 },
}

impl PollOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Success { attempts }
            | PollOutcome::Failed { attempts, .. }
            | PollOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    Resolve(PollOutcome),
}

/// Per-session poll bookkeeping. Lives from the first status check until resolution.
#[derive(Debug, Clone)]
pub struct PollState {
    pub interval: Duration,
    pub max_retries: u32,
    consecutive_errors: u32,
    attempts: u32,
    phase: PollPhase,
}

impl PollState {
    pub fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
            consecutive_errors: 0,
            attempts: 0,
            phase: PollPhase::Idle,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn start(&mut self) {
        self.phase = PollPhase::Polling;
    }

    /// Applies one attempt. Errors only fail the poll once `max_retries` is exceeded;
    /// a pending response resets the error streak.
    pub fn record(&mut self, result: AttemptResult) -> PollStep {
        self.attempts = self.attempts.saturating_add(1);
        match result {
            AttemptResult::TransportError(last_error) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                if self.consecutive_errors > self.max_retries {
                    self.resolve_failed(PollFailure::ErrorBudgetExhausted {
                        consecutive_errors: self.consecutive_errors,
                        last_error,
                    })
                } else {
                    PollStep::Continue
                }
            }
            AttemptResult::FailMatched => self.resolve_failed(PollFailure::FailMatched),
            AttemptResult::SuccessMatched => {
                self.phase = PollPhase::Success;
                PollStep::Resolve(PollOutcome::Success {
                    attempts: self.attempts,
                })
            }
            AttemptResult::Pending => {
                self.consecutive_errors = 0;
                PollStep::Continue
            }
        }
    }

    pub fn cancel(&mut self) -> PollOutcome {
        self.phase = PollPhase::Cancelled;
        PollOutcome::Cancelled {
            attempts: self.attempts,
        }
    }

    fn resolve_failed(&mut self, reason: PollFailure) -> PollStep {
        self.phase = PollPhase::Failed;
        PollStep::Resolve(PollOutcome::Failed {
            attempts: self.attempts,
            reason,
        })
    }
}
