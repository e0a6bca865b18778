//! Service configuration loaded from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::fetch::FetchConfig;
use crate::logging::LogConfig;

const BIND_ADDR_ENV: &str = "SITE_META_BIND_ADDR";
const USER_AGENT_ENV: &str = "SITE_META_USER_AGENT";
const CONNECT_TIMEOUT_ENV: &str = "SITE_META_CONNECT_TIMEOUT_SECS";
const REQUEST_TIMEOUT_ENV: &str = "SITE_META_REQUEST_TIMEOUT_SECS";
const DEADLINE_ENV: &str = "SITE_META_DEADLINE_SECS";
const MAX_BODY_BYTES_ENV: &str = "SITE_META_MAX_BODY_BYTES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: SocketAddr,

    /// Settings for outbound page retrieval.
    pub fetch: FetchConfig,

    /// Diagnostic logging switch.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults)
    ///
    /// Optional:
    /// - `LOG_ENABLE`: Enable diagnostic logging (default: off)
    /// - `SITE_META_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `SITE_META_USER_AGENT`: Outbound User-Agent (default: "site-meta/<version>")
    /// - `SITE_META_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 10)
    /// - `SITE_META_REQUEST_TIMEOUT_SECS`: Per-request transport timeout (default: 30)
    /// - `SITE_META_DEADLINE_SECS`: Body retrieval deadline, 0 disables (default: 60)
    /// - `SITE_META_MAX_BODY_BYTES`: Largest accepted page body (default: 8 MiB)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = FetchConfig::default();

        let bind_addr = match parse_var::<SocketAddr>(BIND_ADDR_ENV)? {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDR
                .parse()
                .context("invalid default bind address")?,
        };

        let user_agent = std::env::var(USER_AGENT_ENV)
            .ok()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let connect_timeout = parse_var::<u64>(CONNECT_TIMEOUT_ENV)?
            .map_or(defaults.connect_timeout, Duration::from_secs);

        let request_timeout = parse_var::<u64>(REQUEST_TIMEOUT_ENV)?
            .map_or(defaults.request_timeout, Duration::from_secs);

        let deadline = match parse_var::<u64>(DEADLINE_ENV)? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.deadline,
        };

        let max_body_bytes = parse_var::<usize>(MAX_BODY_BYTES_ENV)?.unwrap_or(defaults.max_body_bytes);

        Ok(Self {
            bind_addr,
            fetch: FetchConfig {
                user_agent,
                connect_timeout,
                request_timeout,
                deadline,
                max_body_bytes,
            },
            log: LogConfig::from_env(),
        })
    }

    /// Log the effective settings through the current dispatcher
    pub fn log_summary(&self) {
        tracing::info!(
            bind_addr = %self.bind_addr,
            user_agent = %self.fetch.user_agent,
            connect_timeout_secs = self.fetch.connect_timeout.as_secs(),
            request_timeout_secs = self.fetch.request_timeout.as_secs(),
            deadline_secs = self.fetch.deadline.map(|d| d.as_secs()),
            max_body_bytes = self.fetch.max_body_bytes,
            log_enabled = self.log.enabled,
            "site-meta configuration loaded"
        );
    }
}

/// Parse an optional variable; present but unparsable is an error
fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {key}: {value:?}")),
        _ => Ok(None),
    }
}
