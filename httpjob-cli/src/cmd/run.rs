use std::io::{self, Write};

use httpjob_exec::{HttpJob, JobError, JobReport};
use serde::Serialize;

use crate::cmd::config::load_props;
use crate::exit_codes;
use crate::output::{emit, print_error, Report};
use crate::{DefinitionArgs, OutputArgs};

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RunResult {
    Succeeded(JobReport),
    Failed { job_id: String, error: String },
    Cancelled { job_id: String, error: String },
}

impl Report for RunResult {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        match self {
            RunResult::Succeeded(report) => {
                writeln!(out, "Job {} succeeded", report.job_id)?;
                writeln!(out, "  Status code: {}", report.status_code)?;
                if let Some(n) = report.poll_attempts {
                    writeln!(out, "  Status checks: {n}")?;
                }
                writeln!(out, "  Elapsed: {}ms", report.elapsed_ms)
            }
            RunResult::Failed { job_id, error } => writeln!(out, "Job {job_id} failed: {error}"),
            RunResult::Cancelled { job_id, error } => {
                writeln!(out, "Job {job_id} cancelled: {error}")
            }
        }
    }

    fn is_failure(&self) -> bool {
        !matches!(self, RunResult::Succeeded(_))
    }
}

pub async fn run_cmd(definition: &DefinitionArgs, job_id: Option<String>, output: OutputArgs) -> i32 {
    let props = match load_props(definition, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let job_id = job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let job = HttpJob::new(job_id, props);

    let cancel = job.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling job");
            cancel.cancel();
        }
    });

    match job.run().await {
        Ok(report) => {
            emit(&output, &RunResult::Succeeded(report));
            exit_codes::SUCCESS
        }
        Err(JobError::Config(e)) => {
            print_error(&output, &e.to_string());
            exit_codes::VALIDATION_FAILED
        }
        Err(e) => {
            let (job_id, error) = (job.id().to_string(), e.to_string());
            let result = match &e {
                JobError::Cancelled { .. } => RunResult::Cancelled { job_id, error },
                _ => RunResult::Failed { job_id, error },
            };
            emit(&output, &result);
            exit_codes::for_job_error(&e)
        }
    }
}
