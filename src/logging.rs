//! Diagnostic logging setup
//!
//! Logging is off unless `LOG_ENABLE` is set to a truthy value. When it is
//! on, events go to a `tracing-subscriber` fmt layer filtered by `RUST_LOG`
//! (falling back to [`DEFAULT_FILTER`]).
//!
//! The resulting [`Dispatch`] is handed to
//! [`SiteMeta::with_logger`](crate::SiteMeta::with_logger); the server binary
//! also installs it as the process default so request spans share it.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Environment variable that switches diagnostics on
pub const LOG_ENV: &str = "LOG_ENABLE";

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "site_meta=debug,info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Read [`LOG_ENV`]; absent or unrecognized values leave logging off
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var(LOG_ENV).is_ok_and(|value| is_truthy(&value)),
            ..Self::default()
        }
    }
}

/// `1`, `true`, `yes` and `on`, ignoring case and surrounding whitespace
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Build the dispatcher described by `config`
///
/// ```rust
/// use site_meta::logging::{LogConfig, dispatch};
///
/// let silent = dispatch(&LogConfig::default());
/// assert!(silent.is::<tracing::subscriber::NoSubscriber>());
/// ```
pub fn dispatch(config: &LogConfig) -> Dispatch {
    if !config.enabled {
        return Dispatch::none();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    Dispatch::new(subscriber)
}
