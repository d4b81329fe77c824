//! Wildcard key patterns.

use regex::Regex;

use super::CacheError;

/// Key pattern where `*` matches any run of characters, including none.
///
/// Every other character is literal. Matching is case-insensitive and covers
/// the whole key.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, CacheError> {
        if pattern.is_empty() {
            return Err(CacheError::InvalidPattern("pattern is empty".to_string()));
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?is)^{}$", body))
            .map_err(|e| CacheError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
