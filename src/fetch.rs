//! Page retrieval
//!
//! A fetch is two requests sharing one short-lived client (and therefore one
//! cookie store):
//!
//! 1. a `HEAD` probe, whose `Content-Type` decides whether the target is
//!    HTML at all and gives the first charset guess
//! 2. a `GET` for the body, skipped entirely when the probe says "not HTML"
//!
//! The body read runs as its own task. The caller awaits it against its
//! cancellation token and the configured deadline; whichever fires first
//! aborts the task, which drops the in-flight connection.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::content_type::classify;
use crate::error::SiteMetaError;

/// Default cap on retrieved body size
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Transport settings for a [`Fetcher`]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Whole-request transport timeout; expiry is a network error
    pub request_timeout: Duration,
    /// Caller-side deadline on body retrieval; expiry is a cancellation
    pub deadline: Option<Duration>,
    /// Bodies larger than this are refused by the parser
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("site-meta/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            deadline: Some(Duration::from_secs(60)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// A retrieved HTML page awaiting parsing
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    /// Charset label; starts as the header guess and is refined in-document
    pub encoding: String,
    pub body: Bytes,
}

/// Parse and check a target URL
///
/// Only absolute `http` and `https` URLs are accepted.
///
/// ```rust
/// use site_meta::fetch::parse_url;
///
/// assert!(parse_url("https://example.com/page").is_ok());
/// assert!(parse_url("invalid url").is_err());
/// assert!(parse_url("ftp://example.com/").is_err());
/// ```
pub fn parse_url(input: &str) -> Result<Url, SiteMetaError> {
    let url = Url::parse(input.trim()).map_err(|e| SiteMetaError::invalid_url(input, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SiteMetaError::invalid_url(
            input,
            format!("unsupported scheme '{scheme}'"),
        )),
    }
}

/// Aborts the wrapped task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn cancelled() -> SiteMetaError {
    SiteMetaError::Cancelled("operation cancelled by caller".to_string())
}

/// Probes and retrieves pages
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch an HTML page
    ///
    /// # Errors
    ///
    /// - `UnsupportedContent` if the probe's content type is not HTML; no
    ///   body is requested in that case
    /// - `Network` on any transport failure
    /// - `Cancelled` if `cancel` fires or the deadline passes first
    pub async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, SiteMetaError> {
        // One client per call: its cookie store must not leak across invocations
        let client = self.client()?;

        let content_type = self.probe(&client, url, cancel).await?;
        let class = classify(content_type.as_deref());
        tracing::debug!(
            url = %url,
            content_type = content_type.as_deref().unwrap_or(""),
            is_html = class.is_html,
            charset = %class.charset,
            "probed target"
        );

        if !class.is_html {
            return Err(SiteMetaError::UnsupportedContent {
                content_type: content_type.unwrap_or_default(),
            });
        }

        let body = self.retrieve(client, url.clone(), cancel).await?;
        tracing::debug!(url = %url, bytes = body.len(), "retrieved body");

        Ok(FetchedPage {
            url: url.clone(),
            encoding: class.charset,
            body,
        })
    }

    fn client(&self) -> Result<Client, SiteMetaError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(self.config.user_agent.as_str())
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.request_timeout)
            .build()?;
        Ok(client)
    }

    /// `HEAD` the target and return its `Content-Type`, if any
    async fn probe(
        &self,
        client: &Client,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, SiteMetaError> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            response = client.head(url.clone()).send() => response?,
        };

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string))
    }

    /// `GET` the body in a separate task, reading at most one byte past the
    /// size limit
    async fn retrieve(
        &self,
        client: Client,
        url: Url,
        cancel: &CancellationToken,
    ) -> Result<Bytes, SiteMetaError> {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        let limit = self.config.max_body_bytes;
        let mut task = AbortOnDrop(tokio::spawn(async move {
            let mut response = client.get(url).send().await?;
            let mut body = BytesMut::new();
            while let Some(chunk) = response.chunk().await? {
                body.extend_from_slice(&chunk);
                if body.len() > limit {
                    break;
                }
            }
            Ok::<Bytes, SiteMetaError>(body.freeze())
        }));

        let deadline = self.config.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(cancelled()),
            _ = expired => Err(SiteMetaError::Cancelled(format!(
                "deadline of {:?} exceeded",
                deadline.unwrap_or_default()
            ))),
            joined = &mut task.0 => match joined {
                Ok(result) => result,
                Err(err) => Err(SiteMetaError::Cancelled(format!(
                    "body retrieval did not complete: {err}"
                ))),
            },
        }
    }
}
