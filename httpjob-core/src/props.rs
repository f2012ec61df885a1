use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::error::ConfigError;

/// The flat key/value namespace of one job (`url`, `method`, `status.url`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    entries: BTreeMap<String, String>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn get_u64(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Later entries win.
    pub fn merge(&mut self, other: Props) {
        self.entries.extend(other.entries);
    }

    /// Applies `KEY=VALUE` overrides; items without `=` are ignored.
    pub fn apply_overrides(&mut self, overrides: &[String]) {
        for s in overrides {
            if let Some((k, v)) = s.split_once('=') {
                self.insert(k.trim(), v);
            }
        }
    }

    /// Parses `.properties` text (the format of scheduler `.job` files).
    pub fn parse_properties(input: &str) -> Result<Self, ConfigError> {
        let mut props = Props::new();
        let mut lines = input.lines().enumerate();
        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let first = raw.trim_start();
            if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
                continue;
            }

            let mut logical = first.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            props.insert(unescape(key, line_no)?, unescape(value, line_no)?);
        }
        Ok(props)
    }

    /// Flattens a JSON (or YAML-decoded) object into dotted keys.
    pub fn from_json(value: &JsonValue) -> Result<Self, ConfigError> {
        let JsonValue::Object(map) = value else {
            return Err(ConfigError::NotAnObject);
        };
        let mut props = Props::new();
        flatten_into(&mut props, "", map)?;
        Ok(props)
    }
}

impl FromIterator<(String, String)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn flatten_into(
    props: &mut Props,
    prefix: &str,
    map: &serde_json::Map<String, JsonValue>,
) -> Result<(), ConfigError> {
    for (k, v) in map {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            JsonValue::String(s) => props.insert(key, s.clone()),
            JsonValue::Number(n) => props.insert(key, n.to_string()),
            JsonValue::Bool(b) => props.insert(key, b.to_string()),
            JsonValue::Object(inner) => flatten_into(props, &key, inner)?,
            JsonValue::Array(_) => {
                return Err(ConfigError::UnsupportedValue { key, kind: "array" })
            }
            JsonValue::Null => return Err(ConfigError::UnsupportedValue { key, kind: "null" }),
        }
    }
    Ok(())
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => {
                let rest = line[i..].trim_start_matches([' ', '\t']);
                let rest = rest
                    .strip_prefix(|c: char| c == '=' || c == ':')
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start_matches([' ', '\t']));
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str, line: usize) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| ConfigError::Properties {
                        line,
                        message: format!("malformed \\u escape: \\u{hex}"),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_job_file_with_comments_and_separators() {
        let text = "# http job\n\
                    type=http\n\
                    url = http://localhost/run\n\
                    method:POST\n\
                    ! also a comment\n\
                    \n\
                    body   IDS=2020\n";
        let props = Props::parse_properties(text).unwrap();
        assert_eq!(props.get("type"), Some("http"));
        assert_eq!(props.get("url"), Some("http://localhost/run"));
        assert_eq!(props.get("method"), Some("POST"));
        assert_eq!(props.get("body"), Some("IDS=2020"));
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn decodes_escapes_and_continuations() {
        let text = "headers=Accept: text/plain\\r\\nX-Trace: a\\:b\n\
                    long=first \\\n    second\n\
                    snow=\\u2603\n";
        let props = Props::parse_properties(text).unwrap();
        assert_eq!(
            props.get("headers"),
            Some("Accept: text/plain\r\nX-Trace: a:b")
        );
        assert_eq!(props.get("long"), Some("first second"));
        assert_eq!(props.get("snow"), Some("\u{2603}"));
    }

    #[test]
    fn rejects_malformed_unicode_escape() {
        let err = Props::parse_properties("a=ok\nb=\\u12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Properties { line: 2, .. }));
    }

    #[test]
    fn key_without_value_is_empty() {
        let props = Props::parse_properties("body\nfailEval=\n").unwrap();
        assert_eq!(props.get("body"), Some(""));
        assert_eq!(props.get("failEval"), Some(""));
    }

    #[test]
    fn flattens_nested_objects_into_dotted_keys() {
        let v = serde_json::json!({
            "url": "http://localhost/run",
            "timeout": 5000,
            "status": { "url": "http://localhost/status", "max-retries": 2, "enabled": true }
        });
        let props = Props::from_json(&v).unwrap();
        assert_eq!(props.get("timeout"), Some("5000"));
        assert_eq!(props.get("status.url"), Some("http://localhost/status"));
        assert_eq!(props.get("status.max-retries"), Some("2"));
        assert_eq!(props.get("status.enabled"), Some("true"));
    }

    #[test]
    fn flatten_rejects_arrays_and_non_objects() {
        let err = Props::from_json(&serde_json::json!({"status": {"url": []}})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedValue {
                key: "status.url".to_string(),
                kind: "array"
            }
        );
        assert_eq!(
            Props::from_json(&serde_json::json!("url")).unwrap_err(),
            ConfigError::NotAnObject
        );
    }

    #[test]
    fn overrides_replace_existing_values() {
        let mut props = Props::parse_properties("method=GET\n").unwrap();
        props.apply_overrides(&["method=POST".to_string(), "ignored".to_string()]);
        assert_eq!(props.get("method"), Some("POST"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn merge_prefers_later_values() {
        let mut base = Props::parse_properties("url=http://a/\nmethod=GET\n").unwrap();
        base.merge(Props::parse_properties("method=POST\nbody=x\n").unwrap());
        assert_eq!(base.get("url"), Some("http://a/"));
        assert_eq!(base.get("method"), Some("POST"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn get_u64_trims_and_reports_bad_numbers() {
        let mut props = Props::new();
        props.insert("timeout", " 2500 ");
        props.insert("status.interval", "soon");
        assert_eq!(props.get_u64("timeout", 3000).unwrap(), 2500);
        assert_eq!(props.get_u64("missing", 7).unwrap(), 7);
        assert!(matches!(
            props.get_u64("status.interval", 1000),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
