//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use dispatcher::{DispatcherConfig, PrioritySource};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid server config: {0}")]
pub struct ConfigError(pub String);

/// HTTP server and dispatch policy settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Requests running longer than this are aborted with 408.
    pub request_timeout: Duration,
    pub priority_source: PrioritySource,
    pub allow_complete_unclaimed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            priority_source: PrioritySource::Caller,
            allow_complete_unclaimed: true,
        }
    }
}

impl ServerConfig {
    /// Build a config from environment variables.
    ///
    /// - `DISPATCH_BIND` (default: `0.0.0.0`)
    /// - `PORT` (default: `8080`)
    /// - `DISPATCH_REQUEST_TIMEOUT_SECS` (default: `30`)
    /// - `DISPATCH_PRIORITY_SOURCE` (`caller`|`random`, default: `caller`)
    /// - `DISPATCH_ALLOW_COMPLETE_UNCLAIMED` (`true`/`false`, default: `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = parse_env("DISPATCH_BIND")?.unwrap_or(defaults.bind);
        let port = parse_env("PORT")?.unwrap_or(defaults.port);
        let request_timeout = parse_env::<u64>("DISPATCH_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        if request_timeout.is_zero() {
            return Err(ConfigError(
                "DISPATCH_REQUEST_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        let priority_source =
            parse_env("DISPATCH_PRIORITY_SOURCE")?.unwrap_or(defaults.priority_source);
        let allow_complete_unclaimed = parse_bool_env("DISPATCH_ALLOW_COMPLETE_UNCLAIMED")?
            .unwrap_or(defaults.allow_complete_unclaimed);

        Ok(Self {
            bind,
            port,
            request_timeout,
            priority_source,
            allow_complete_unclaimed,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::default().with_allow_complete_unclaimed(self.allow_complete_unclaimed)
    }
}

fn env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(v) => Ok(non_empty(v)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError(format!("failed reading {name}: {e}"))),
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)?
        .map(|v| {
            v.parse()
                .map_err(|e| ConfigError(format!("invalid value for {name}={v}: {e}")))
        })
        .transpose()
}

fn parse_bool_env(name: &str) -> Result<Option<bool>, ConfigError> {
    let Some(v) = env_var(name)? else {
        return Ok(None);
    };

    let parsed = match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => true,
        "0" | "false" | "no" | "n" => false,
        _ => {
            return Err(ConfigError(format!(
                "invalid boolean for {name}={v} (expected true/false)"
            )));
        }
    };
    Ok(Some(parsed))
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
