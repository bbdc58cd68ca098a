//! Engine configuration.
//!
//! Defaults suit a host that re-invokes every few seconds. Both knobs can be
//! overridden from the environment:
//!
//! - `CAPACITY_RESERVATION_CALLBACK_DELAY_SECS` - delay requested between stabilization checks
//! - `CAPACITY_RESERVATION_MAX_STABILIZATION_ATTEMPTS` - checks before Create gives up

use std::time::Duration;
use tracing::warn;

pub const CALLBACK_DELAY_ENV: &str = "CAPACITY_RESERVATION_CALLBACK_DELAY_SECS";
pub const MAX_STABILIZATION_ATTEMPTS_ENV: &str = "CAPACITY_RESERVATION_MAX_STABILIZATION_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay the host should wait before re-invoking a suspended operation.
    pub callback_delay: Duration,
    /// Stabilization checks allowed before Create fails with NotStabilized.
    pub max_stabilization_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            callback_delay: Duration::from_secs(5),
            max_stabilization_attempts: 60,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            callback_delay: parse_var(&lookup, CALLBACK_DELAY_ENV)
                .map(Duration::from_secs)
                .unwrap_or(defaults.callback_delay),
            max_stabilization_attempts: parse_var(&lookup, MAX_STABILIZATION_ATTEMPTS_ENV)
                .unwrap_or(defaults.max_stabilization_attempts),
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable setting, using default");
            None
        }
    }
}
