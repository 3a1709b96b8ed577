use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `timeLimit` value meaning "run without a deadline"
pub const NO_TIME_LIMIT: i64 = -1;

/// A problem scraped from a judge page by the browser extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub interactive: bool,
    #[serde(rename = "timeLimit", default = "default_time_limit")]
    pub time_limit_ms: i64,
    /// Informational only, never enforced
    #[serde(rename = "memoryLimit", default)]
    pub memory_limit_mb: i64,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

fn default_time_limit() -> i64 {
    NO_TIME_LIMIT
}

impl Question {
    /// Per-test wall-clock deadline, `None` when the question sets no limit
    pub fn time_limit(&self) -> Option<Duration> {
        if self.time_limit_ms <= 0 {
            None
        } else {
            Some(Duration::from_millis(self.time_limit_ms as u64))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub output: String,
}
