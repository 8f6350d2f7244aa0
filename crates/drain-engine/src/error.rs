//! Engine error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::sink::SinkError;

/// Errors surfaced by the batch engine
///
/// The delivery variants carry the dropped batch's size for diagnostics; once
/// an error is returned the batch's data is gone (no dead-letter
/// persistence). A caller that does not observe the outcome loses the
/// error silently - a documented hazard, not a safety net.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine was constructed with an invalid configuration
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    /// A flush failed with retry disabled
    #[error("sink rejected batch of {events} events: {source}")]
    Sink {
        /// Events in the dropped batch
        events: usize,
        #[source]
        source: SinkError,
    },

    /// A batch was dropped after exhausting its retry budget
    #[error("batch of {events} events dropped after {attempts} retries: {source}")]
    RetriesExhausted {
        /// Retry attempts performed
        attempts: u32,
        /// Events in the dropped batch
        events: usize,
        #[source]
        source: SinkError,
    },
}

impl EngineError {
    /// Events in the batch this error dropped
    pub fn dropped_events(&self) -> usize {
        match self {
            Self::Config(_) => 0,
            Self::Sink { events, .. } | Self::RetriesExhausted { events, .. } => *events,
        }
    }
}
