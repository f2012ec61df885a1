use std::io::{self, Write};

use serde::Serialize;

use crate::OutputArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A command outcome, rendered as human-readable lines or as one JSON document.
pub trait Report: Serialize {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Failed outcomes in text form go to stderr. JSON always goes to stdout.
    fn is_failure(&self) -> bool {
        false
    }
}

pub fn emit<R: Report>(output: &OutputArgs, report: &R) {
    if output.quiet {
        return;
    }
    let written = match output.format {
        OutputFormat::Text if report.is_failure() => report.write_text(&mut io::stderr().lock()),
        OutputFormat::Text => report.write_text(&mut io::stdout().lock()),
        OutputFormat::Json => {
            let mut out = io::stdout().lock();
            serde_json::to_writer(&mut out, report)
                .map_err(io::Error::from)
                .and_then(|()| writeln!(out))
        }
    };
    if let Err(e) = written {
        tracing::debug!("failed to write output: {e}");
    }
}

pub fn print_error(output: &OutputArgs, message: &str) {
    if output.quiet {
        return;
    }
    match output.format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}
