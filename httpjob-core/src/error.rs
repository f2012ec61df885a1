use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration required: {0}")]
    MissingKey(String),
    #[error("unsupported request method: {0}. Only POST and GET are supported")]
    UnsupportedMethod(String),
    #[error("invalid URL in {key}: {message}")]
    InvalidUrl { key: String, message: String },
    #[error("invalid number in {key}: {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("configuration required: {key} must not be empty")]
    MissingStatusEval { key: String },
    #[error("unsupported value for {key}: {kind} values cannot be flattened")]
    UnsupportedValue { key: String, kind: &'static str },
    #[error("job definition must be an object at the top level")]
    NotAnObject,
    #[error("invalid properties at line {line}: {message}")]
    Properties { line: usize, message: String },
}

/// Why a single path query could not be evaluated. Callers downgrade this to "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no response body to evaluate")]
    MissingBody,
    #[error("response body is not JSON: {0}")]
    InvalidJson(String),
    #[error("invalid JSONPath {path:?}: {message}")]
    InvalidPath { path: String, message: String },
}
