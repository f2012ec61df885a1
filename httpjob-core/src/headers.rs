pub const HEADER_LINE_DELIMITER: &str = "\r\n";
pub const HEADER_NAME_VALUE_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parses a CRLF-joined `Name:Value` block. The first colon splits name from value;
/// lines without a colon are dropped. Order is preserved.
pub fn parse_headers(raw: &str) -> Vec<Header> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(HEADER_LINE_DELIMITER)
        .filter_map(|line| line.split_once(HEADER_NAME_VALUE_DELIMITER))
        .map(|(name, value)| Header::new(name.trim(), value.trim()))
        .collect()
}
