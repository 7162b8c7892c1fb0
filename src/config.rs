//! Orchestrator configuration.
//!
//! Configuration is plain serde data, usually loaded from TOML:
//!
//! ```toml
//! debounce = "500ms"
//! initial_quantity = 1
//! event_buffer = 32
//! history_limit = 64
//! ```

use crate::effects::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use stillwater::validation::Validation;
use thiserror::Error;

const MAX_DEBOUNCE: Duration = Duration::from_secs(10);

/// Problems found while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("debounce window must be greater than zero")]
    ZeroDebounce,

    #[error("debounce window of {0:?} is unreasonably large (max: 10s)")]
    DebounceTooLarge(Duration),

    #[error("initial quantity must be at least 1")]
    ZeroQuantity,

    #[error("event buffer must hold at least one event")]
    ZeroEventBuffer,

    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ConfigError>),
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Settings for one pricing orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Quiet period after the last quantity edit before prices reload
    #[serde(with = "humantime_serde", default = "default_debounce")]
    pub debounce: Duration,

    /// Quantity the widget starts with
    #[serde(default = "default_initial_quantity")]
    pub initial_quantity: u32,

    /// Capacity of the event queue between handles and the machine task
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Most recent transitions kept in the machine history and snapshots
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_debounce() -> Duration {
    Duration::from_millis(500)
}

fn default_initial_quantity() -> u32 {
    1
}

fn default_event_buffer() -> usize {
    32
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce: default_debounce(),
            initial_quantity: default_initial_quantity(),
            event_buffer: default_event_buffer(),
            history_limit: default_history_limit(),
        }
    }
}

impl OrchestratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate().into_result().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Check every setting, reporting all problems at once.
    pub fn validate(&self) -> Validation<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.debounce.is_zero() {
            errors.push(ConfigError::ZeroDebounce);
        } else if self.debounce > MAX_DEBOUNCE {
            errors.push(ConfigError::DebounceTooLarge(self.debounce));
        }

        if self.initial_quantity == 0 {
            errors.push(ConfigError::ZeroQuantity);
        }

        if self.event_buffer == 0 {
            errors.push(ConfigError::ZeroEventBuffer);
        }

        if errors.is_empty() {
            Validation::Success(())
        } else {
            Validation::Failure(errors)
        }
    }

    /// Initial quantity, falling back to 1 for a zero value.
    pub fn initial_quantity(&self) -> NonZeroU32 {
        NonZeroU32::new(self.initial_quantity).unwrap_or(NonZeroU32::MIN)
    }
}
