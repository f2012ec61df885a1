use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    /// Suppress results and errors; logs drop to warnings.
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DefinitionArgs {
    /// Job definition: `.json`, `.yaml`/`.yml`, or a properties file.
    pub path: PathBuf,
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_props: Vec<String>,
}
