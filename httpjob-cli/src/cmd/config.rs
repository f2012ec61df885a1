use std::path::Path;

use httpjob_core::Props;

use crate::exit_codes;
use crate::output::print_error;
use crate::{DefinitionArgs, OutputArgs};

/// Reads the definition file and applies `--set` overrides. On failure the error is
/// already printed and the exit code is returned.
pub fn load_props(definition: &DefinitionArgs, output: &OutputArgs) -> Result<Props, i32> {
    let content = match std::fs::read_to_string(&definition.path) {
        Ok(c) => c,
        Err(e) => {
            print_error(
                output,
                &format!("failed to read {}: {e}", definition.path.display()),
            );
            return Err(exit_codes::RUNTIME_ERROR);
        }
    };

    let mut props = match parse_definition(&definition.path, &content) {
        Ok(p) => p,
        Err(message) => {
            print_error(output, &message);
            return Err(exit_codes::VALIDATION_FAILED);
        }
    };
    props.apply_overrides(&definition.set_props);
    Ok(props)
}

fn parse_definition(path: &Path, content: &str) -> Result<Props, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| format!("JSON parse failed: {e}"))?;
            Props::from_json(&value).map_err(|e| e.to_string())
        }
        Some("yaml" | "yml") => {
            let value: serde_json::Value =
                serde_yaml::from_str(content).map_err(|e| format!("YAML parse failed: {e}"))?;
            Props::from_json(&value).map_err(|e| e.to_string())
        }
        _ => Props::parse_properties(content).map_err(|e| e.to_string()),
    }
}
