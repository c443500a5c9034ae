use serde::{Deserialize, Serialize};

/// Engine configuration, supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the dashboard data service.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Background polling interval in milliseconds.
    /// Zero or negative disables polling; the initial load still runs.
    pub poll_interval_ms: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            request_timeout_secs: 10,
            poll_interval_ms: 15_000,
        }
    }
}
