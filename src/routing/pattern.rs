//! Path patterns with `{name}` placeholders, compiled once into anchored regexes.
//!
//! Placeholder rules:
//! - `{id}` matches one or more ASCII digits
//! - `{token}` matches one or more lowercase hex characters
//! - any other `{name}` matches one or more non-slash characters
//!
//! Everything outside a placeholder is matched literally.

use std::sync::Arc;

use regex::Regex;

use super::RouteError;

const ID_CAPTURE: &str = "([0-9]+)";
const TOKEN_CAPTURE: &str = "([a-f0-9]+)";
const SEGMENT_CAPTURE: &str = "([^/]+)";

#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    names: Arc<[String]>,
    matcher: Regex,
}

impl RoutePattern {
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        let mut src = String::with_capacity(pattern.len() + 16);
        let mut names = Vec::new();
        let mut rest = pattern;

        src.push('^');
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_placeholder_name(&after[..close]) => {
                    let name = &after[..close];
                    src.push_str(&regex::escape(&rest[..open]));
                    src.push_str(capture_for(name));
                    names.push(name.to_string());
                    rest = &after[close + 1..];
                }
                // A brace that doesn't open a placeholder is literal text.
                _ => {
                    src.push_str(&regex::escape(&rest[..=open]));
                    rest = after;
                }
            }
        }
        src.push_str(&regex::escape(rest));
        src.push('$');

        let matcher = Regex::new(&src).map_err(|source| RouteError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            names: names.into(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Captured values in left-to-right order, or `None` if `path` doesn't match.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.matcher.captures(path)?;
        let values = caps
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        Some(PathParams {
            names: Arc::clone(&self.names),
            values,
        })
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn capture_for(name: &str) -> &'static str {
    match name {
        "id" => ID_CAPTURE,
        "token" => TOKEN_CAPTURE,
        _ => SEGMENT_CAPTURE,
    }
}

/// Values captured from the request path, positional first, by name second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    names: Arc<[String]>,
    values: Vec<String>,
}

impl PathParams {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn named(&self, name: &str) -> Option<&str> {
        let index = self.names.iter().position(|n| n == name)?;
        self.get(index)
    }

    /// Positional value parsed as an integer id. `None` when absent or out of range.
    pub fn int(&self, index: usize) -> Option<i64> {
        self.get(index)?.parse().ok()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}
