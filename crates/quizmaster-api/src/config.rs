//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default length of one countdown second, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 1000;
/// Default number of events buffered for slow subscribers.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
/// Default length of generated quiz codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;
/// Longest accepted generated quiz code.
pub const MAX_CODE_LENGTH: usize = 16;

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Wall-clock duration of one countdown second.
    pub tick: Duration,
    /// Capacity of the event broadcast channel.
    pub event_channel_capacity: usize,
    /// Length of generated quiz codes.
    pub code_length: usize,
    /// OTLP collector endpoint; tracing export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ApiConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for
    /// absent keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse(&lookup, "PORT", DEFAULT_PORT)?;

        let tick_ms: u64 = parse(&lookup, "QUESTION_TICK_MS", DEFAULT_TICK_MS)?;
        if tick_ms == 0 {
            return Err(AppError::Config("QUESTION_TICK_MS must be positive".to_owned()));
        }

        let event_channel_capacity =
            parse(&lookup, "EVENT_CHANNEL_CAPACITY", DEFAULT_EVENT_CHANNEL_CAPACITY)?;
        if event_channel_capacity == 0 {
            return Err(AppError::Config("EVENT_CHANNEL_CAPACITY must be positive".to_owned()));
        }

        let code_length = parse(&lookup, "QUIZ_CODE_LENGTH", DEFAULT_CODE_LENGTH)?;
        if !(1..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(AppError::Config(format!(
                "QUIZ_CODE_LENGTH must be between 1 and {MAX_CODE_LENGTH}"
            )));
        }

        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            host,
            port,
            tick: Duration::from_millis(tick_ms),
            event_channel_capacity,
            code_length,
            otlp_endpoint,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.event_channel_capacity, 256);
        assert_eq!(config.code_length, 6);
        assert!(config.otlp_endpoint.is_none());
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_values_are_read_from_environment() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("QUESTION_TICK_MS", "250"),
            ("QUIZ_CODE_LENGTH", "8"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.tick, Duration::from_millis(250));
        assert_eq!(config.code_length, 8);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_invalid_values_fail_with_config_error() {
        for pairs in [
            [("PORT", "not-a-port")],
            [("QUESTION_TICK_MS", "0")],
            [("EVENT_CHANNEL_CAPACITY", "0")],
            [("QUIZ_CODE_LENGTH", "0")],
        ] {
            match config_from(&pairs) {
                Err(AppError::Config(_)) => {}
                other => panic!("expected Config error for {pairs:?}, got {other:?}"),
            }
        }
    }
}
