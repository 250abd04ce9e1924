//! Which collection names count as cache collections.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Marker that flags a collection as a cache by default.
pub const DEFAULT_CACHE_MARKER: &str = "_cache";

/// Case-sensitive test applied to collection names.
#[derive(Debug, Clone)]
pub enum CollectionMatcher {
    /// Name contains the string anywhere
    Substring(String),
    /// Name starts with the string
    Prefix(String),
    /// Name matches the regular expression (unanchored unless the pattern anchors itself)
    Pattern(Regex),
}

impl CollectionMatcher {
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            CollectionMatcher::Substring(marker) => name.contains(marker.as_str()),
            CollectionMatcher::Prefix(prefix) => name.starts_with(prefix.as_str()),
            CollectionMatcher::Pattern(regex) => regex.is_match(name),
        }
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(CollectionMatcher::Pattern(Regex::new(pattern)?))
    }

    /// Build from settings. Empty markers are refused, they would match every collection.
    pub fn from_config(config: &MatcherConfig) -> Result<Self> {
        let value = config.value();
        if value.is_empty() {
            let kind = config.kind();
            return Err(Error::Config(format!("{kind} matcher needs a non-empty value")));
        }

        match config {
            MatcherConfig::Substring(marker) => Ok(CollectionMatcher::Substring(marker.clone())),
            MatcherConfig::Prefix(prefix) => Ok(CollectionMatcher::Prefix(prefix.clone())),
            MatcherConfig::Pattern(pattern) => Self::pattern(pattern),
        }
    }
}

impl Default for CollectionMatcher {
    fn default() -> Self {
        CollectionMatcher::Substring(DEFAULT_CACHE_MARKER.to_string())
    }
}

impl fmt::Display for CollectionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionMatcher::Substring(marker) => write!(f, "substring '{marker}'"),
            CollectionMatcher::Prefix(prefix) => write!(f, "prefix '{prefix}'"),
            CollectionMatcher::Pattern(regex) => write!(f, "pattern /{}/", regex.as_str()),
        }
    }
}

/// Serialized form of a matcher, e.g. `{ "kind": "prefix", "value": "tmp_" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MatcherConfig {
    Substring(String),
    Prefix(String),
    Pattern(String),
}

impl MatcherConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            MatcherConfig::Substring(_) => "substring",
            MatcherConfig::Prefix(_) => "prefix",
            MatcherConfig::Pattern(_) => "pattern",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            MatcherConfig::Substring(value)
            | MatcherConfig::Prefix(value)
            | MatcherConfig::Pattern(value) => value,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig::Substring(DEFAULT_CACHE_MARKER.to_string())
    }
}
