//! API handlers and shared utilities.
//!
//! This module organizes the service's route handlers and provides common
//! functions for time and the response envelope.

pub mod auth;
pub mod health;
pub mod participants;
pub(crate) mod response;
pub mod root;
pub mod users;

use std::time::SystemTime;

/// Unix seconds for token TTL computation and expiry checks.
pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_unix_seconds_is_recent() {
        // 2023-01-01 as a lower bound; guards against zero/overflow fallbacks.
        assert!(now_unix_seconds() > 1_672_531_200);
    }
}
