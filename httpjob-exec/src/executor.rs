use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};

/// A response that passed status classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub status: u16,
    /// `None` when the response had no body.
    pub body: Option<String>,
}

impl ResponseOutcome {
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    #[error("HTTP execute error, status: {status}, message: {}", .reason.as_deref().unwrap_or("unknown"))]
    Status {
        status: u16,
        reason: Option<String>,
        body: Option<String>,
    },
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl ExecutionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ExecutionError::Status { status, .. } => Some(*status),
            ExecutionError::Transport(_) => None,
        }
    }
}

/// Status codes in `[400, 600)` are errors whatever the body says.
pub fn classify(resp: HttpResponseParts) -> Result<ResponseOutcome, ExecutionError> {
    let body = if resp.body.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&resp.body).into_owned())
    };

    if (400..600).contains(&resp.status) {
        return Err(ExecutionError::Status {
            status: resp.status,
            reason: resp.reason,
            body,
        });
    }

    Ok(ResponseOutcome {
        status: resp.status,
        body,
    })
}

/// Sends the request once and classifies the result. Judging the body is up to the caller.
pub async fn execute(
    http: &dyn HttpClient,
    req: HttpRequestParts,
) -> Result<ResponseOutcome, ExecutionError> {
    let resp = http.send(req).await?;
    let outcome = classify(resp)?;
    match outcome.body() {
        Some(body) => tracing::info!("HTTP response [{body}]"),
        None => tracing::info!("HTTP No response"),
    }
    Ok(outcome)
}
