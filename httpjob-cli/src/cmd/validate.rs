use std::io::{self, Write};

use httpjob_core::JobConfig;
use serde::Serialize;

use crate::cmd::config::load_props;
use crate::exit_codes;
use crate::output::{emit, Report};
use crate::{DefinitionArgs, OutputArgs};

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl ValidateResult {
    fn from_config(cfg: &JobConfig) -> Self {
        Self {
            valid: true,
            method: Some(cfg.request.method.to_string()),
            url: Some(cfg.request.url.to_string()),
            status_url: cfg.status.as_ref().map(|s| s.request.url.to_string()),
            errors: vec![],
        }
    }

    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            method: None,
            url: None,
            status_url: None,
            errors: vec![error],
        }
    }
}

impl Report for ValidateResult {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        if !self.valid {
            writeln!(out, "error: validation failed")?;
            for e in &self.errors {
                writeln!(out, "- {e}")?;
            }
            return Ok(());
        }
        writeln!(
            out,
            "ok: {} {}",
            self.method.as_deref().unwrap_or_default(),
            self.url.as_deref().unwrap_or_default()
        )?;
        if let Some(url) = &self.status_url {
            writeln!(out, "  status: {url}")?;
        }
        Ok(())
    }

    fn is_failure(&self) -> bool {
        !self.valid
    }
}

pub async fn validate_cmd(definition: &DefinitionArgs, output: OutputArgs) -> i32 {
    let props = match load_props(definition, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };

    match JobConfig::from_props(&props) {
        Ok(cfg) => {
            emit(&output, &ValidateResult::from_config(&cfg));
            exit_codes::SUCCESS
        }
        Err(e) => {
            emit(&output, &ValidateResult::invalid(e.to_string()));
            exit_codes::VALIDATION_FAILED
        }
    }
}
