//! Run configuration and its validation.
//!
//! The binary parses the five positional numbers with `clap`; this module owns
//! the range rules so that a bad value is rejected before the office region or
//! the log file exist.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for the customer arrival delay (`TZ`), in milliseconds.
pub const MAX_ARRIVAL_DELAY_MS: u64 = 10_000;
/// Upper bound for a worker break (`TU`), in milliseconds.
pub const MAX_BREAK_MS: u64 = 100;
/// Upper bound for the closing decision (`F`), in milliseconds.
pub const MAX_CLOSE_AFTER_MS: u64 = 10_000;
/// Upper bound for serving a single customer, in milliseconds.
pub const MAX_SERVICE_MS: u64 = 10;

/// Errors raised while validating the run configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid range of parameters: {name} must be at most {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        max: u64,
    },

    #[error("invalid range of parameters: at least one worker is required")]
    NoWorkers,
}

/// Population and timing of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeConfig {
    /// `NZ`: number of customers.
    pub customers: u32,
    /// `NU`: number of workers.
    pub workers: u32,
    /// `TZ`: longest time a customer takes to reach the office.
    pub max_arrival_delay_ms: u64,
    /// `TU`: longest break a worker takes when idle.
    pub max_break_ms: u64,
    /// `F`: longest time before the office closes.
    pub max_close_after_ms: u64,
}

impl OfficeConfig {
    /// Builds a configuration and checks every range.
    pub fn new(
        customers: u32,
        workers: u32,
        max_arrival_delay_ms: u64,
        max_break_ms: u64,
        max_close_after_ms: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            customers,
            workers,
            max_arrival_delay_ms,
            max_break_ms,
            max_close_after_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        check("TZ", self.max_arrival_delay_ms, MAX_ARRIVAL_DELAY_MS)?;
        check("TU", self.max_break_ms, MAX_BREAK_MS)?;
        check("F", self.max_close_after_ms, MAX_CLOSE_AFTER_MS)?;
        Ok(())
    }

    pub fn max_arrival_delay(&self) -> Duration {
        Duration::from_millis(self.max_arrival_delay_ms)
    }

    pub fn max_break(&self) -> Duration {
        Duration::from_millis(self.max_break_ms)
    }

    /// Window `[F/2, F]` the orchestrator waits in before closing.
    pub fn close_window(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.max_close_after_ms / 2),
            Duration::from_millis(self.max_close_after_ms),
        )
    }
}

fn check(name: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::OutOfRange { name, value, max });
    }
    Ok(())
}
