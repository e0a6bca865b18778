//! Error types for metadata extraction

use thiserror::Error;

/// Errors that can terminate a metadata extraction
///
/// Every stage of the pipeline fails with exactly one of these. Nothing is
/// retried internally; the first failure is surfaced to the caller.
///
/// A page that simply has no Open Graph or Twitter Card tags is *not* an
/// error: it yields an empty [`MetadataSet`](crate::model::MetadataSet).
#[derive(Debug, Error)]
pub enum SiteMetaError {
    /// The input could not be parsed as an absolute URL
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure reaching the target (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The target responded, but not with HTML
    #[error("unsupported content type '{content_type}': target content seems like not html")]
    UnsupportedContent { content_type: String },

    /// The retrieved body could not be turned into a document
    #[error("parse error: {0}")]
    Parse(String),

    /// The resolved charset is unknown or the text is malformed in it
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The caller abandoned the operation before it completed
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl SiteMetaError {
    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SiteMetaError::InvalidUrl { .. } => "invalid_url",
            SiteMetaError::Network(_) => "network",
            SiteMetaError::UnsupportedContent { .. } => "unsupported_content",
            SiteMetaError::Parse(_) => "parse",
            SiteMetaError::Encoding(_) => "encoding",
            SiteMetaError::Cancelled(_) => "cancelled",
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl ToString) -> Self {
        SiteMetaError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
