//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as the bound on each acceptor request.

use std::time::Duration;

/// Default bound on a single acceptor request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Application behavior configuration.
///
/// A request that does not complete within `request_timeout` is recorded as
/// an absent response.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    pub request_timeout: Duration,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in milliseconds.
    pub fn with_timeout_millis(millis: u64) -> Self {
        Self {
            request_timeout: Duration::from_millis(millis),
        }
    }
}
