//! The extraction pipeline
//!
//! [`SiteMeta`] drives one invocation through every stage, in a single pass
//! with no retries:
//!
//! ```text
//! probe ─┬─ not HTML ──────────────────────────────────────────▶ UnsupportedContent
//!        └─ fetch ─▶ parse ─▶ resolve charset ─▶ extract ─┬─ none ─▶ empty set
//!                                                         └─ normalize ─▶ validate ─▶ set
//! ```
//!
//! Any stage may end the invocation with an error; none is revisited. A page
//! without Open Graph or Twitter Card tags is a success with an empty
//! [`MetadataSet`].
//!
//! # Logging
//!
//! Components never reach for a global logger. `SiteMeta` owns a
//! [`tracing::Dispatch`] (silent unless one is supplied through
//! [`SiteMeta::with_logger`]) and every invocation runs with it as the
//! scoped default.
//!
//! # Examples
//!
//! ```rust
//! use site_meta::SiteMeta;
//!
//! let site_meta = SiteMeta::default();
//! let body = br#"<html><head>
//!     <meta property="og:title" content="The Rock">
//!     <meta name="twitter:card" content="summary">
//!     <meta name="viewport" content="width=device-width">
//! </head></html>"#;
//!
//! let meta = site_meta.extract(Some("text/html"), body).unwrap();
//! assert_eq!(meta.get("og:title"), Some("The Rock"));
//! assert_eq!(meta.get("twitter:card"), Some("summary"));
//! assert_eq!(meta.len(), 2);
//! ```

use tokio_util::sync::CancellationToken;
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

use crate::charset::resolve_charset;
use crate::content_type::classify;
use crate::dom::parse_html;
use crate::encoding;
use crate::error::SiteMetaError;
use crate::extract::extract_candidates;
use crate::fetch::{FetchConfig, FetchedPage, Fetcher, parse_url};
use crate::model::MetadataSet;

/// Entry point: fetch a page and extract its social metadata
#[derive(Debug, Clone)]
pub struct SiteMeta {
    fetcher: Fetcher,
    logger: Dispatch,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl SiteMeta {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            fetcher: Fetcher::new(config),
            logger: Dispatch::none(),
        }
    }

    /// Route this instance's diagnostics to `logger`
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = logger;
        self
    }

    pub fn fetch_config(&self) -> &FetchConfig {
        self.fetcher.config()
    }

    /// Fetch `url` and extract its Open Graph and Twitter Card metadata
    ///
    /// # Errors
    ///
    /// Fails with the first error any stage produces:
    /// `InvalidUrl` before any network access, `Network`, `UnsupportedContent`
    /// (no body is requested), `Parse`, `Encoding`, or `Cancelled` when
    /// `cancel` fires or the fetch deadline passes during body retrieval.
    pub async fn parse(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<MetadataSet, SiteMetaError> {
        self.run(url, cancel)
            .with_subscriber(self.logger.clone())
            .await
    }

    async fn run(&self, url: &str, cancel: &CancellationToken) -> Result<MetadataSet, SiteMetaError> {
        tracing::info!(url, "extracting metadata");

        let result = async {
            let url = parse_url(url)?;
            let page = self.fetcher.fetch(&url, cancel).await?;
            self.process(page)
        }
        .await;

        log_outcome(url, &result);
        result
    }

    /// Run the offline stages on an already retrieved response
    ///
    /// `content_type` is the response's `Content-Type` header, if any.
    ///
    /// # Errors
    ///
    /// `UnsupportedContent` if the content type is not HTML (the body is not
    /// parsed), otherwise as [`SiteMeta::parse`] minus the network kinds.
    pub fn extract(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<MetadataSet, SiteMetaError> {
        tracing::dispatcher::with_default(&self.logger, || {
            let class = classify(content_type);
            if !class.is_html {
                return Err(SiteMetaError::UnsupportedContent {
                    content_type: content_type.unwrap_or_default().to_string(),
                });
            }

            let mut charset = class.charset;
            self.analyze(&mut charset, body)
        })
    }

    fn process(&self, mut page: FetchedPage) -> Result<MetadataSet, SiteMetaError> {
        let meta = self.analyze(&mut page.encoding, &page.body)?;
        tracing::debug!(url = %page.url, charset = %page.encoding, "processed page");
        Ok(meta)
    }

    /// parse → resolve charset → extract → normalize → validate
    fn analyze(&self, charset: &mut String, body: &[u8]) -> Result<MetadataSet, SiteMetaError> {
        let doc = parse_html(body, self.fetcher.config().max_body_bytes)?;
        *charset = resolve_charset(&doc, charset);

        let candidates = extract_candidates(&doc);
        if candidates.is_empty() {
            return Ok(MetadataSet::new());
        }

        let attrs = encoding::normalize(charset, candidates)?;
        Ok(MetadataSet::from_attributes(attrs))
    }
}

fn log_outcome(url: &str, result: &Result<MetadataSet, SiteMetaError>) {
    match result {
        Ok(meta) if meta.is_empty() => {
            tracing::info!(url, "no social metadata found");
        }
        Ok(meta) => {
            tracing::info!(url, entries = meta.len(), "extracted metadata");
        }
        Err(err) => {
            tracing::warn!(url, kind = err.kind(), error = %err, "extraction failed");
        }
    }
}
