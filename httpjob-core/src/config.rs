use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::eval::EvalExpression;
use crate::headers::{parse_headers, Header};
use crate::props::Props;

pub const URL: &str = "url";
pub const METHOD: &str = "method";
pub const HEADERS: &str = "headers";
pub const BODY: &str = "body";
pub const TIMEOUT: &str = "timeout";
pub const REQUEST_TIMEOUT: &str = "requestTimeout";
pub const CONNECTION_TIMEOUT: &str = "connectionTimeout";
pub const SOCKET_TIMEOUT: &str = "socketTimeout";
pub const SUCCESS_EVAL: &str = "successEval";
pub const FAIL_EVAL: &str = "failEval";
pub const STATUS_PREFIX: &str = "status.";
pub const STATUS_INTERVAL: &str = "status.interval";
pub const STATUS_MAX_RETRIES: &str = "status.max-retries";

pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_STATUS_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_STATUS_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_STATUS_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(ConfigError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Request, connect and socket (read) timeouts for one phase. A configured `0` means
/// no limit and is kept as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
    pub socket: Option<Duration>,
}

impl Timeouts {
    pub fn uniform(d: Duration) -> Self {
        let d = Some(d).filter(|d| !d.is_zero());
        Self {
            request: d,
            connect: d,
            socket: d,
        }
    }

    fn from_props(props: &Props, prefix: &str, default_ms: u64) -> Result<Self, ConfigError> {
        let generic = props.get_u64(&format!("{prefix}{TIMEOUT}"), default_ms)?;
        let specific = |key: &str| -> Result<Option<Duration>, ConfigError> {
            let ms = props.get_u64(&format!("{prefix}{key}"), generic)?;
            Ok((ms > 0).then(|| Duration::from_millis(ms)))
        };
        Ok(Self {
            request: specific(REQUEST_TIMEOUT)?,
            connect: specific(CONNECTION_TIMEOUT)?,
            socket: specific(SOCKET_TIMEOUT)?,
        })
    }
}

/// Everything needed to send one request of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<Header>,
    /// Only sent for POST, and only when non-empty.
    pub body: String,
    pub timeouts: Timeouts,
}

impl RequestConfig {
    /// Reads `{prefix}method`, `{prefix}url`, `{prefix}headers`, `{prefix}body` and the timeouts.
    pub fn from_props(props: &Props, prefix: &str, default_timeout_ms: u64) -> Result<Self, ConfigError> {
        let method: HttpMethod = props
            .get_string(&format!("{prefix}{METHOD}"), "GET")
            .parse()?;

        let url_key = format!("{prefix}{URL}");
        let raw_url = props.require(&url_key)?;
        let url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            key: url_key.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            method,
            url,
            headers: parse_headers(props.get(&format!("{prefix}{HEADERS}")).unwrap_or("")),
            body: props.get_string(&format!("{prefix}{BODY}"), ""),
            timeouts: Timeouts::from_props(props, prefix, default_timeout_ms)?,
        })
    }
}

/// The polling phase, present when `status.url` is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    pub request: RequestConfig,
    pub success_eval: EvalExpression,
    pub fail_eval: EvalExpression,
    pub interval: Duration,
    /// Consecutive transport errors tolerated before the poll fails.
    pub max_retries: u32,
}

impl StatusConfig {
    fn from_props(props: &Props) -> Result<Self, ConfigError> {
        let success_key = format!("{STATUS_PREFIX}{SUCCESS_EVAL}");
        let success_eval = EvalExpression::parse(props.get(&success_key).unwrap_or(""));
        if success_eval.is_empty() {
            return Err(ConfigError::MissingStatusEval { key: success_key });
        }

        let max_retries = props.get_u64(STATUS_MAX_RETRIES, u64::from(DEFAULT_STATUS_MAX_RETRIES))?;
        let max_retries = u32::try_from(max_retries).map_err(|_| ConfigError::InvalidNumber {
            key: STATUS_MAX_RETRIES.to_string(),
            value: max_retries.to_string(),
        })?;

        Ok(Self {
            request: RequestConfig::from_props(props, STATUS_PREFIX, DEFAULT_STATUS_TIMEOUT_MS)?,
            success_eval,
            fail_eval: EvalExpression::parse(
                props.get(&format!("{STATUS_PREFIX}{FAIL_EVAL}")).unwrap_or(""),
            ),
            interval: Duration::from_millis(
                props.get_u64(STATUS_INTERVAL, DEFAULT_STATUS_INTERVAL_MS)?,
            ),
            max_retries,
        })
    }
}

/// Immutable snapshot of one job's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub request: RequestConfig,
    pub success_eval: EvalExpression,
    pub fail_eval: EvalExpression,
    pub status: Option<StatusConfig>,
}

impl JobConfig {
    pub fn from_props(props: &Props) -> Result<Self, ConfigError> {
        let request = RequestConfig::from_props(props, "", DEFAULT_TIMEOUT_MS)?;
        let status = if props.contains_key(&format!("{STATUS_PREFIX}{URL}")) {
            Some(StatusConfig::from_props(props)?)
        } else {
            None
        };
        Ok(Self {
            request,
            success_eval: EvalExpression::parse(props.get(SUCCESS_EVAL).unwrap_or("")),
            fail_eval: EvalExpression::parse(props.get(FAIL_EVAL).unwrap_or("")),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_for_minimal_job() {
        let cfg = JobConfig::from_props(&props(&[("url", "http://localhost/run")])).unwrap();
        assert_eq!(cfg.request.method, HttpMethod::Get);
        assert_eq!(cfg.request.timeouts, Timeouts::uniform(Duration::from_millis(3000)));
        assert!(cfg.request.headers.is_empty());
        assert!(cfg.request.body.is_empty());
        assert!(cfg.success_eval.is_empty());
        assert!(cfg.fail_eval.is_empty());
        assert!(cfg.status.is_none());
    }

    #[test]
    fn method_must_be_get_or_post() {
        for m in ["PUT", "DELETE", "get", ""] {
            let err = JobConfig::from_props(&props(&[("url", "http://a/"), ("method", m)]))
                .unwrap_err();
            assert_eq!(err, ConfigError::UnsupportedMethod(m.to_string()));
        }
    }

    #[test]
    fn url_is_required_and_must_parse() {
        assert_eq!(
            JobConfig::from_props(&Props::new()).unwrap_err(),
            ConfigError::MissingKey("url".to_string())
        );
        assert!(matches!(
            JobConfig::from_props(&props(&[("url", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn specific_timeouts_fall_back_to_generic() {
        let cfg = JobConfig::from_props(&props(&[
            ("url", "http://a/"),
            ("timeout", "5000"),
            ("socketTimeout", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.request.timeouts.request, Some(Duration::from_millis(5000)));
        assert_eq!(cfg.request.timeouts.connect, Some(Duration::from_millis(5000)));
        assert_eq!(cfg.request.timeouts.socket, Some(Duration::from_millis(9000)));
    }

    #[test]
    fn zero_timeout_means_no_limit() {
        let cfg = JobConfig::from_props(&props(&[("url", "http://a/"), ("timeout", "0")])).unwrap();
        assert_eq!(cfg.request.timeouts, Timeouts::uniform(Duration::ZERO));
        assert_eq!(cfg.request.timeouts.request, None);

        let cfg = JobConfig::from_props(&props(&[
            ("url", "http://a/"),
            ("timeout", "2000"),
            ("connectionTimeout", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.request.timeouts.connect, None);
        assert_eq!(cfg.request.timeouts.socket, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn status_phase_defaults() {
        let cfg = JobConfig::from_props(&props(&[
            ("url", "http://a/run"),
            ("timeout", "100"),
            ("status.url", "http://a/status"),
            ("status.successEval", "$[?(@.code==1)]"),
        ]))
        .unwrap();
        let status = cfg.status.unwrap();
        assert_eq!(status.request.method, HttpMethod::Get);
        assert_eq!(status.request.timeouts, Timeouts::uniform(Duration::from_millis(30_000)));
        assert_eq!(status.interval, Duration::from_millis(1000));
        assert_eq!(status.max_retries, 3);
        assert!(status.fail_eval.is_empty());
    }

    #[test]
    fn status_phase_reads_its_own_namespace() {
        let cfg = JobConfig::from_props(&props(&[
            ("url", "http://a/run"),
            ("method", "POST"),
            ("status.url", "http://a/status"),
            ("status.method", "POST"),
            ("status.body", "id=1"),
            ("status.headers", "X-Job: 1"),
            ("status.timeout", "250"),
            ("status.interval", "20"),
            ("status.max-retries", "0"),
            ("status.successEval", "$.done"),
            ("status.failEval", "$.error"),
        ]))
        .unwrap();
        let status = cfg.status.unwrap();
        assert_eq!(status.request.url.as_str(), "http://a/status");
        assert_eq!(status.request.body, "id=1");
        assert_eq!(status.request.headers, vec![Header::new("X-Job", "1")]);
        assert_eq!(status.request.timeouts, Timeouts::uniform(Duration::from_millis(250)));
        assert_eq!(status.interval, Duration::from_millis(20));
        assert_eq!(status.max_retries, 0);
        assert_eq!(status.fail_eval.members(), ["$.error"]);
    }

    #[test]
    fn status_phase_requires_success_eval() {
        let err = JobConfig::from_props(&props(&[
            ("url", "http://a/run"),
            ("status.url", "http://a/status"),
            ("status.failEval", "$.error"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingStatusEval {
                key: "status.successEval".to_string()
            }
        );
    }

    #[test]
    fn status_keys_without_status_url_are_ignored() {
        let cfg = JobConfig::from_props(&props(&[
            ("url", "http://a/run"),
            ("status.method", "PATCH"),
        ]))
        .unwrap();
        assert!(cfg.status.is_none());
    }

    #[test]
    fn invalid_status_method_is_a_config_error() {
        let err = JobConfig::from_props(&props(&[
            ("url", "http://a/run"),
            ("status.url", "http://a/status"),
            ("status.method", "PATCH"),
            ("status.successEval", "$.done"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedMethod("PATCH".to_string()));
    }
}
