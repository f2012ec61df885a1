use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

use crate::error::EvalError;

pub const EXPRESSION_DELIMITER: char = ',';

/// A comma-separated set of JSONPath queries, matched with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalExpression {
    raw: String,
    members: Vec<String>,
}

impl EvalExpression {
    pub fn parse(raw: &str) -> Self {
        let members = raw
            .split(EXPRESSION_DELIMITER)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            raw: raw.to_string(),
            members,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// No members means no constraint.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if any member matches. Members that fail to evaluate count as non-matching.
    pub fn matches(&self, body: Option<&str>) -> bool {
        self.members.iter().any(|path| match evaluate_path(body, path) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "JSONPath eval error");
                false
            }
        })
    }
}

/// `(fail empty OR fail does not match) AND (success empty OR success matches)`.
pub fn verdict(body: Option<&str>, success_eval: &EvalExpression, fail_eval: &EvalExpression) -> bool {
    let not_failed = fail_eval.is_empty() || !fail_eval.matches(body);
    not_failed && (success_eval.is_empty() || success_eval.matches(body))
}

/// Evaluates one JSONPath query against a response body.
///
/// No node is a miss. A path with a wildcard, filter or descendant selector yields a list,
/// so any node at all is a hit. Otherwise a single `null` or empty array/object is a miss,
/// any other single value is a hit, as is a result of several nodes.
pub fn evaluate_path(body: Option<&str>, path: &str) -> Result<bool, EvalError> {
    let body = body.ok_or(EvalError::MissingBody)?;
    let json: JsonValue =
        serde_json::from_str(body).map_err(|e| EvalError::InvalidJson(e.to_string()))?;

    let jsonpath = JsonPath::parse(path).map_err(|e| EvalError::InvalidPath {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    // A root filter tests the document itself when the root is not an array.
    let target = if path.starts_with("$[?") && !json.is_array() {
        JsonValue::Array(vec![json])
    } else {
        json
    };

    let nodes = jsonpath.query(&target).all();
    Ok(match nodes.as_slice() {
        [] => false,
        [single] => selects_many(path) || is_present(single),
        _ => true,
    })
}

fn selects_many(path: &str) -> bool {
    path.contains('*') || path.contains("[?") || path.contains("..")
}

fn is_present(v: &JsonValue) -> bool {
    match v {
        JsonValue::Null => false,
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
        _ => true,
    }
}
