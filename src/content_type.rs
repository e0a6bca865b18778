//! Content-Type classification
//!
//! The transport-level `Content-Type` header decides two things before any
//! body is retrieved:
//!
//! 1. **Is it HTML?** Only values containing `text/html` are accepted.
//! 2. **First-pass charset**: the `charset=<token>` parameter, upper-cased,
//!    or `UTF-8` when the header has none (or is absent).
//!
//! The charset found here is only a hint. [`crate::charset`] may override it
//! from signals inside the document.
//!
//! # Examples
//!
//! ```rust
//! use site_meta::content_type::classify;
//!
//! let class = classify(Some("text/html; charset=euc-jp"));
//! assert!(class.is_html);
//! assert_eq!(class.charset, "EUC-JP");
//!
//! let class = classify(Some("application/pdf"));
//! assert!(!class.is_html);
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Canonical charset label used when nothing else is declared
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Media type substring that marks a response as HTML
const HTML_MEDIA_TYPE: &str = "text/html";

/// Result of classifying a `Content-Type` header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentClass {
    /// Whether the pipeline should proceed at all
    pub is_html: bool,
    /// Upper-cased charset label, `UTF-8` when none was declared
    pub charset: String,
}

/// Classify a raw `Content-Type` header value
///
/// A missing header is never HTML. The charset is extracted regardless of
/// the media type so that callers can log what the server claimed.
pub fn classify(content_type: Option<&str>) -> ContentClass {
    let Some(raw) = content_type.map(str::trim) else {
        return ContentClass {
            is_html: false,
            charset: DEFAULT_CHARSET.to_string(),
        };
    };

    ContentClass {
        is_html: is_html(raw),
        charset: charset_or_default(raw),
    }
}

/// Whether a `Content-Type` value denotes HTML
///
/// Media types are case-insensitive, so `Text/HTML` is accepted too.
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(HTML_MEDIA_TYPE)
}

/// Extract the `charset=<token>` parameter from a header-like value
///
/// Token characters are ASCII letters, digits, `-` and `_` (so that
/// `Shift_JIS` survives intact). A quoted value is accepted, an empty one
/// is treated as absent.
///
/// # Examples
///
/// ```rust
/// use site_meta::content_type::extract_charset;
///
/// assert_eq!(extract_charset("text/html; charset=UTF-8"), Some("UTF-8".to_string()));
/// assert_eq!(extract_charset("text/html; charset=\"Shift_JIS\""), Some("Shift_JIS".to_string()));
/// assert_eq!(extract_charset("text/html"), None);
/// assert_eq!(extract_charset("text/html; charset="), None);
/// ```
pub fn extract_charset(value: &str) -> Option<String> {
    static CHARSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = CHARSET_REGEX
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([A-Za-z0-9_-]+)"#).ok());
    let regex = regex.as_ref()?;

    regex
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract and normalize the charset, falling back to [`DEFAULT_CHARSET`]
pub fn charset_or_default(value: &str) -> String {
    extract_charset(value)
        .map(|charset| normalize_charset(&charset))
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// Normalize charset name to uppercase
///
/// ```rust
/// use site_meta::content_type::normalize_charset;
///
/// assert_eq!(normalize_charset("utf-8"), "UTF-8");
/// assert_eq!(normalize_charset("Shift_JIS"), "SHIFT_JIS");
/// ```
pub fn normalize_charset(charset: &str) -> String {
    charset.trim().to_uppercase()
}
