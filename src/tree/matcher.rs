//! Exclusion pattern matching against snapshot keys

use crate::error::SnapshotError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do with a pattern that does not compile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternPolicy {
    /// Fail the build before traversal starts
    #[default]
    Strict,
    /// Log a warning and exclude nothing
    Lenient,
}

/// A compiled exclusion pattern
///
/// Matching is an unanchored regex search over the `/`-separated path
/// relative to the snapshot root. An empty pattern excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPattern {
    regex: Option<Regex>,
}

impl ExclusionPattern {
    /// Pattern that excludes nothing
    pub fn none() -> Self {
        Self { regex: None }
    }

    pub fn compile(pattern: &str, policy: PatternPolicy) -> Result<Self, SnapshotError> {
        if pattern.is_empty() {
            return Ok(Self::none());
        }
        match Regex::new(pattern) {
            Ok(regex) => Ok(Self { regex: Some(regex) }),
            Err(source) => match policy {
                PatternPolicy::Strict => Err(SnapshotError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
                PatternPolicy::Lenient => {
                    warn!(pattern, error = %source, "Ignoring malformed exclude pattern");
                    Ok(Self::none())
                }
            },
        }
    }

    /// True if `relative_path` should be left out of the snapshot
    pub fn matches(&self, relative_path: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(relative_path))
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

/// One-shot match. A malformed pattern never matches.
pub fn matches(pattern: &str, relative_path: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    Regex::new(pattern).is_ok_and(|regex| regex.is_match(relative_path))
}
