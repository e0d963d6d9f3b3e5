//! Environment-driven runtime configuration.

use std::{env, time::Duration};

use tracing::warn;

/// Keepalive ping interval used when the environment does not override it.
const DEFAULT_KEEPALIVE_SECS: u64 = 15;
/// Default capacity of the process-wide broadcast channel.
const DEFAULT_WIRE_CAPACITY: usize = 64;
/// Default TCP port.
const DEFAULT_PORT: u16 = 8080;

/// Environment variable overriding the keepalive interval, in seconds.
const KEEPALIVE_ENV: &str = "SNATCH_KEEPALIVE_SECS";
/// Environment variable overriding the broadcast channel capacity.
const WIRE_CAPACITY_ENV: &str = "SNATCH_WIRE_CAPACITY";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    port: u16,
    keepalive: Duration,
    wire_capacity: usize,
}

impl AppConfig {
    /// Load configuration from the environment, warning about unparsable
    /// values and falling back to defaults.
    pub fn load() -> Self {
        Self {
            port: env::var("PORT")
                .or_else(|_| env::var("SNATCH_PORT"))
                .ok()
                .and_then(|value| parse_or_warn("PORT", &value))
                .unwrap_or(DEFAULT_PORT),
            keepalive: Duration::from_secs(
                env::var(KEEPALIVE_ENV)
                    .ok()
                    .and_then(|value| parse_or_warn(KEEPALIVE_ENV, &value))
                    .unwrap_or(DEFAULT_KEEPALIVE_SECS),
            ),
            wire_capacity: env::var(WIRE_CAPACITY_ENV)
                .ok()
                .and_then(|value| parse_or_warn(WIRE_CAPACITY_ENV, &value))
                .unwrap_or(DEFAULT_WIRE_CAPACITY),
        }
    }

    /// TCP port the server binds to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Interval between keepalive pings on each connection.
    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    /// Capacity of the shared broadcast channel.
    pub fn wire_capacity(&self) -> usize {
        self.wire_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            keepalive: Duration::from_secs(DEFAULT_KEEPALIVE_SECS),
            wire_capacity: DEFAULT_WIRE_CAPACITY,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(%name, %value, "ignoring unparsable configuration value");
            None
        }
    }
}
