#![forbid(unsafe_code)]

//! Runtime for HTTP jobs.
//!
//! Configuration parsing and response judging live in `httpjob-core`; this crate sends the
//! requests and drives the status poll.

pub mod executor;
pub mod http;
pub mod job;
pub mod poll;
pub mod request;

pub use crate::executor::{execute, ExecutionError, ResponseOutcome};
pub use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use crate::job::{HttpJob, JobError, JobReport};
pub use crate::poll::{PollFailure, PollOutcome, Poller};
