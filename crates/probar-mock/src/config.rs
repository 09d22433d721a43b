//! Mock scope configuration

use crate::result::MockResult;
use serde::{Deserialize, Serialize};

/// Configuration for an [`ExpectationList`](crate::ExpectationList)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Treat calls made out of their declared order as verification failures
    pub strict_ordering: bool,
    /// Accept calls to functions that have no expectation at all
    pub ignore_other_calls: bool,
}

impl MockConfig {
    /// Create a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail verification when a call happens out of its declared order
    #[must_use]
    pub const fn with_strict_ordering(mut self, strict: bool) -> Self {
        self.strict_ordering = strict;
        self
    }

    /// Accept calls to functions nobody set an expectation for
    #[must_use]
    pub const fn with_ignore_other_calls(mut self, ignore: bool) -> Self {
        self.ignore_other_calls = ignore;
        self
    }

    /// Load a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> MockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this config to JSON
    pub fn to_json(&self) -> MockResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
