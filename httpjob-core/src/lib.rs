#![forbid(unsafe_code)]

//! Configuration model and response evaluation for HTTP jobs.
//!
//! Nothing in this crate performs I/O; sending requests and polling live in `httpjob-exec`.

pub mod config;
pub mod error;
pub mod eval;
pub mod headers;
pub mod props;

pub use crate::config::{HttpMethod, JobConfig, RequestConfig, StatusConfig, Timeouts};
pub use crate::error::{ConfigError, EvalError};
pub use crate::eval::{evaluate_path, verdict, EvalExpression};
pub use crate::headers::{parse_headers, Header};
pub use crate::props::Props;
