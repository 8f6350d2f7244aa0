//! Engine configuration

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_MAX_WAIT_TIME_MS, RETRY_BASE_DELAY_MS,
    RETRY_MAX_DELAY_MS,
};

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_batch_size` must be at least 1
    #[error("max_batch_size must be positive")]
    InvalidBatchSize,

    /// `max_retries` must be positive when retry is enabled
    #[error("max_retries must be positive when retry is enabled")]
    InvalidRetries,

    /// Backoff delays must be non-zero and ordered
    #[error("retry_max_delay must be >= retry_base_delay and both non-zero")]
    InvalidRetryDelays,
}

/// Tuning knobs for the batch engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Events per batch before a size-triggered flush
    pub max_batch_size: usize,

    /// Longest an appended event waits before a timed flush
    #[serde(with = "duration_ms")]
    pub max_wait_time: Duration,

    /// Optional memory-pressure trigger, in estimated bytes of pending
    /// events (heuristic, not exact accounting)
    pub max_memory_usage: Option<usize>,

    /// Whether failed flushes enter the retry state machine
    pub enable_retry: bool,

    /// Retry attempts per failed batch (effective only with
    /// `enable_retry`)
    pub max_retries: u32,

    /// Base delay for exponential backoff
    #[serde(with = "duration_ms")]
    pub retry_base_delay: Duration,

    /// Cap on the backoff delay
    #[serde(with = "duration_ms")]
    pub retry_max_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_wait_time: Duration::from_millis(DEFAULT_MAX_WAIT_TIME_MS),
            max_memory_usage: None,
            enable_retry: false,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
        }
    }
}

impl EngineConfig {
    /// Set the batch size trigger
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Set the time trigger
    #[must_use]
    pub fn with_max_wait_time(mut self, max_wait_time: Duration) -> Self {
        self.max_wait_time = max_wait_time;
        self
    }

    /// Enable the memory-pressure trigger
    #[must_use]
    pub fn with_max_memory_usage(mut self, bytes: usize) -> Self {
        self.max_memory_usage = Some(bytes);
        self
    }

    /// Enable retry with the given attempt budget
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32) -> Self {
        self.enable_retry = true;
        self.max_retries = max_retries;
        self
    }

    /// Override the backoff delays (tests use short ones)
    #[must_use]
    pub fn with_retry_delays(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base_delay = base;
        self.retry_max_delay = max;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the batch size is zero, retry is
    /// enabled with a zero attempt budget, or the backoff delays are
    /// zero or inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.enable_retry && self.max_retries == 0 {
            return Err(ConfigError::InvalidRetries);
        }
        if self.retry_base_delay.is_zero()
            || self.retry_max_delay.is_zero()
            || self.retry_max_delay < self.retry_base_delay
        {
            return Err(ConfigError::InvalidRetryDelays);
        }
        Ok(())
    }
}

/// Serde helper: durations expressed as integer milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
