use httpjob_core::{HttpMethod, RequestConfig};

use crate::http::HttpRequestParts;

/// Turns a phase's configuration into the request that goes on the wire.
/// POST carries the configured body when it is non-empty; GET never carries one.
pub fn build_request(cfg: &RequestConfig) -> HttpRequestParts {
    tracing::info!("HTTP {} url: {}", cfg.method, cfg.url);

    let body = match cfg.method {
        HttpMethod::Post if !cfg.body.is_empty() => {
            tracing::info!("HTTP body: {}", cfg.body);
            Some(cfg.body.clone())
        }
        _ => None,
    };

    if !cfg.headers.is_empty() {
        tracing::info!("HTTP headers size: {}", cfg.headers.len());
    }

    HttpRequestParts {
        method: cfg.method,
        url: cfg.url.clone(),
        headers: cfg
            .headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpjob_core::{Header, Timeouts};
    use std::time::Duration;

    fn cfg(method: HttpMethod, body: &str) -> RequestConfig {
        RequestConfig {
            method,
            url: url::Url::parse("http://localhost/run").unwrap(),
            headers: vec![Header::new("X-B", "2"), Header::new("X-A", "1")],
            body: body.to_string(),
            timeouts: Timeouts::uniform(Duration::from_millis(100)),
        }
    }

    #[test]
    fn post_carries_non_empty_body() {
        let req = build_request(&cfg(HttpMethod::Post, "IDS=1"));
        assert_eq!(req.body.as_deref(), Some("IDS=1"));
    }

    #[test]
    fn post_with_empty_body_sends_none() {
        assert!(build_request(&cfg(HttpMethod::Post, "")).body.is_none());
    }

    #[test]
    fn get_never_carries_body() {
        assert!(build_request(&cfg(HttpMethod::Get, "IDS=1")).body.is_none());
    }

    #[test]
    fn headers_keep_configuration_order() {
        let req = build_request(&cfg(HttpMethod::Get, ""));
        assert_eq!(
            req.headers,
            vec![
                ("X-B".to_string(), "2".to_string()),
                ("X-A".to_string(), "1".to_string())
            ]
        );
    }
}
