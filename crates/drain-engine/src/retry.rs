//! Exponential backoff policy for failed batches
//!
//! Delays grow as `base * 2^attempt` up to a fixed cap. Retries for one
//! batch run strictly sequentially; independently triggered batches may
//! each be retrying concurrently without coordination.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::{RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_MS};

/// Backoff schedule for one batch's retry sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any delay
    pub max_delay: Duration,
    /// Attempts before the batch is dropped
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            max_retries: 0,
        }
    }
}

impl RetryPolicy {
    /// Derive the policy from an engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            base_delay: config.retry_base_delay,
            max_delay: config.retry_max_delay,
            max_retries: if config.enable_retry {
                config.max_retries
            } else {
                0
            },
        }
    }

    /// True when at least one retry will be attempted
    #[inline]
    pub fn enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Backoff delay before retry `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
