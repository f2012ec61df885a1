use httpjob_exec::JobError;

/// Job succeeded (primary call accepted and, if configured, status poll succeeded).
pub const SUCCESS: i32 = 0;
/// The definition could not be parsed or its configuration is invalid.
pub const VALIDATION_FAILED: i32 = 2;
/// A request failed, the response was rejected, or the status poll failed.
pub const RUN_FAILED: i32 = 3;
/// Unreadable definition file or no async runtime.
pub const RUNTIME_ERROR: i32 = 4;
pub const CANCELLED: i32 = 5;

pub fn for_job_error(err: &JobError) -> i32 {
    match err {
        JobError::Config(_) => VALIDATION_FAILED,
        JobError::Cancelled { .. } => CANCELLED,
        JobError::Execution(_) | JobError::Rejected { .. } | JobError::PollFailed { .. } => {
            RUN_FAILED
        }
    }
}
