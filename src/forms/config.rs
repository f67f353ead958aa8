// SPDX-License-Identifier: MIT

//! Engine configuration

use std::env;
use std::time::Duration;

use super::error::FormError;

/// Environment variable overriding the debounce delay, in milliseconds
pub const DEBOUNCE_ENV: &str = "FORMLOGIC_DEBOUNCE_MS";

/// Default delay between the last value change and recomputation
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Tunables for a form session
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Trailing-edge debounce applied to visibility recomputation
    pub debounce: Duration,
}

impl EngineConfig {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, FormError> {
        match env::var(DEBOUNCE_ENV) {
            Ok(raw) => Self::default().with_debounce_ms(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Override the debounce delay from a millisecond string
    pub fn with_debounce_ms(mut self, raw: &str) -> Result<Self, FormError> {
        let ms: u64 = raw.trim().parse().map_err(|_| {
            FormError::config(format!(
                "{} must be a whole number of milliseconds, got '{}'",
                DEBOUNCE_ENV, raw
            ))
        })?;
        self.debounce = Duration::from_millis(ms);
        Ok(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
