mod runner;
mod state;

pub use runner::Poller;
pub use state::{AttemptResult, PollFailure, PollOutcome, PollPhase, PollState, PollStep};
