use std::time::Duration;

use async_trait::async_trait;
use httpjob_core::{HttpMethod, Timeouts};

#[derive(Debug, Clone)]
pub struct HttpRequestParts {
    pub method: HttpMethod,
    pub url: url::Url,
    /// In configuration order.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    pub reason: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("http error: {0}")]
    Other(String),
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequestParts) -> Result<HttpResponseParts, HttpError>;
}

/// One client per job phase; connect and read timeouts are fixed at construction.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// `connect` bounds connection setup and `socket` bounds each read. `request` is a
    /// wall-clock deadline for the whole exchange, headers and body included, so a slow but
    /// steady response is cut off once it elapses. It does not limit waiting for a pooled
    /// connection. A `None` timeout leaves that stage unbounded.
    pub fn new(timeouts: &Timeouts) -> Result<Self, HttpError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("httpjob/", env!("CARGO_PKG_VERSION")));
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(socket) = timeouts.socket {
            builder = builder.read_timeout(socket);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            request_timeout: timeouts.request,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequestParts) -> Result<HttpResponseParts, HttpError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut rb = self.client.request(method, req.url);
        if let Some(timeout) = self.request_timeout {
            rb = rb.timeout(timeout);
        }

        for (k, v) in req.headers {
            rb = rb.header(k, v);
        }

        if let Some(body) = req.body {
            rb = rb.body(body);
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(map_reqwest_error)?;

        Ok(HttpResponseParts {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return HttpError::Network(e.to_string());
    }
    HttpError::Other(e.to_string())
}
