//! Env line type.
//!
//! Represents one line of a .env file as read by the merge algorithm.

/// One parsed line of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvLine {
    /// Comment, blank, or anything without a usable key. Written back verbatim.
    Passthrough(String),
    /// A `KEY=value` line or a bare `KEY`.
    Assignment(Assignment),
}

/// A key assignment, keeping the line's original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    key: String,
    raw_value: String,
    has_value: bool,
    original: String,
}

impl EnvLine {
    /// Classify a single line.
    ///
    /// Blank lines and lines starting with `#` (after trimming) pass through.
    /// Everything else is split on the first `=`; key and value are trimmed.
    /// A line without `=` is a bare key. A line whose key trims to nothing
    /// passes through.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Self::Passthrough(line.to_string());
        }

        let (key, raw_value, has_value) = match trimmed.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim(), true),
            None => (trimmed, "", false),
        };

        if key.is_empty() {
            return Self::Passthrough(line.to_string());
        }

        Self::Assignment(Assignment {
            key: key.to_string(),
            raw_value: raw_value.to_string(),
            has_value,
            original: line.to_string(),
        })
    }

    /// Key, for assignment lines.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Passthrough(_) => None,
            Self::Assignment(a) => Some(&a.key),
        }
    }

    /// The line exactly as it was read.
    pub fn text(&self) -> &str {
        match self {
            Self::Passthrough(line) => line,
            Self::Assignment(a) => &a.original,
        }
    }
}

impl Assignment {
    /// Key name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value as written in the file, quotes included.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Whether the line had an `=` at all.
    pub fn has_value(&self) -> bool {
        self.has_value
    }

    /// Value with surrounding quotes removed and double-quote escapes resolved.
    ///
    /// Used when reading a file into a secret set. `None` for bare keys.
    pub fn value(&self) -> Option<String> {
        if !self.has_value {
            return None;
        }
        let raw = self.raw_value.as_str();
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Some(unescape_double_quoted(&raw[1..raw.len() - 1]));
        }
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            return Some(raw[1..raw.len() - 1].to_string());
        }
        Some(raw.to_string())
    }

    /// Whether merging `desired` into this line has to rewrite it.
    ///
    /// Bare keys are always rewritten. Otherwise the current value is compared
    /// after stripping one layer of quotes; double-quoted values are compared
    /// with their escapes resolved, the same way they are read.
    pub fn needs_rewrite(&self, desired: &str) -> bool {
        if !self.has_value {
            return true;
        }
        let stripped = strip_quotes(&self.raw_value);
        if stripped.len() < self.raw_value.len() && self.raw_value.starts_with('"') {
            return unescape_double_quoted(stripped) != desired;
        }
        stripped != desired
    }
}

/// Strip one layer of matching `"` or `'` quotes.
///
/// Only applies when the value is longer than two characters, so `""` and
/// `''` are left as they are. Never strips more than one layer.
pub fn strip_quotes(value: &str) -> &str {
    if value.len() <= 2 {
        return value;
    }
    let bytes = value.as_bytes();
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if first == last && (first == b'"' || first == b'\'') {
        return &value[1..value.len() - 1];
    }
    value
}

/// Format an assignment the way dotsync writes it: `KEY="value"`.
///
/// Backslashes, double quotes and line breaks are escaped so the value
/// stays on one line and reads back unchanged.
pub fn format_assignment(key: &str, value: &str) -> String {
    format!("{}=\"{}\"", key, escape_double_quoted(value))
}

fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
