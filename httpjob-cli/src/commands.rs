use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the job: primary call, then status polling when `status.url` is set.
    Run {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[arg(long)]
        job_id: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check a job definition without sending any request.
    Validate {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Command {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Command::Run { output, .. } | Command::Validate { output, .. } => output,
        }
    }
}
