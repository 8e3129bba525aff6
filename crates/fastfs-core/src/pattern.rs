//! Wildcard name patterns for filtered listings.
//!
//! Patterns use the `*` (any sequence) and `?` (any single character)
//! wildcards and match a node's final name case-insensitively.

use crate::error::{FastFsError, Result};
use regex::Regex;

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a wildcard pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        // Convert wildcard pattern to regex
        let mut regex_pattern = String::with_capacity(pattern.len() * 2 + 4);
        regex_pattern.push_str("(?i)^");

        for c in pattern.chars() {
            match c {
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                _ => regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }

        regex_pattern.push('$');

        let regex = Regex::new(&regex_pattern).map_err(|e| FastFsError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(NamePattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether this pattern accepts every name.
    pub fn is_match_all(&self) -> bool {
        !self.source.is_empty() && self.source.chars().all(|c| c == '*')
    }

    /// Match against a final path segment.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Match against the final segment of a full path.
    pub fn matches_path(&self, path: &str) -> bool {
        let trimmed = path.trim_end_matches(crate::types::is_separator);
        let name = match trimmed.rfind(crate::types::is_separator) {
            Some(i) => &trimmed[i + 1..],
            None => trimmed,
        };
        self.matches(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
