//! Job configuration.
//!
//! Everything the reminder job needs is carried in one explicit object built
//! at startup and passed down; there is no process-wide client or transport
//! state.

use std::time::Duration;

use crate::outcome::RetryPolicy;

#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Base URL of the CRM API, e.g. `http://localhost:8080`.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for each fetch.
    pub retry: RetryPolicy,
    /// How far back an order still counts as recent.
    pub window_days: i64,
}

impl ReminderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::fixed(3, Duration::from_millis(500)),
            window_days: 7,
        }
    }

    pub fn with_window_days(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
