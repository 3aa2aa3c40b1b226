use std::time::Duration;

use crate::config::Config;

/// Attempt budget and linear backoff for transient image failures.
///
/// The wait after failed attempt `n` (1-based) is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(3, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Same attempt budget, no waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::linear(max_attempts, Duration::ZERO)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::linear(
            config.image.max_attempts,
            Duration::from_millis(config.image.backoff_base_ms),
        )
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}
