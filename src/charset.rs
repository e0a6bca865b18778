//! In-document charset resolution
//!
//! The `Content-Type` header gives a first guess (see
//! [`crate::content_type`]). The document can override it:
//!
//! 1. **`<meta charset>`**: the first such element wins unconditionally,
//!    its value upper-cased.
//! 2. **`<meta http-equiv="Content-Type">`**: otherwise the first such
//!    element's `content` is run through the same `charset=<token>`
//!    extraction as the header. A `content` without a charset parameter
//!    yields the default (`UTF-8`).
//! 3. **Header value**: kept when neither element is present.
//!
//! Resolution never fails. Whether the label names a real encoding is only
//! checked when attributes are converted.
//!
//! # Examples
//!
//! ```rust
//! use site_meta::charset::resolve_charset;
//! use site_meta::dom::parse_html;
//!
//! let doc = parse_html(b"<meta charset=\"shift_jis\">", 1024).unwrap();
//! assert_eq!(resolve_charset(&doc, "EUC-JP"), "SHIFT_JIS");
//!
//! let doc = parse_html(b"<title>none</title>", 1024).unwrap();
//! assert_eq!(resolve_charset(&doc, "EUC-JP"), "EUC-JP");
//! ```

use std::sync::OnceLock;

use crate::content_type::{charset_or_default, normalize_charset};
use crate::dom::{Document, Element, Selector};

const META_CHARSET: &str = "meta[charset]";
const META_HTTP_EQUIV: &str = r#"meta[http-equiv="content-type" i]"#;

fn selector(cell: &'static OnceLock<Option<Selector>>, source: &str) -> Option<&'static Selector> {
    cell.get_or_init(|| Selector::parse(source).ok()).as_ref()
}

/// Refine `header_charset` with signals found in the document
pub fn resolve_charset<D: Document>(doc: &D, header_charset: &str) -> String {
    if let Some(charset) = charset_from_meta_charset(doc) {
        tracing::debug!(charset = %charset, source = "meta charset", "resolved charset");
        return charset;
    }

    if let Some(charset) = charset_from_http_equiv(doc) {
        tracing::debug!(charset = %charset, source = "meta http-equiv", "resolved charset");
        return charset;
    }

    tracing::debug!(charset = header_charset, source = "content-type header", "resolved charset");
    header_charset.to_string()
}

/// Charset declared by the first `<meta charset>` element
pub fn charset_from_meta_charset<D: Document>(doc: &D) -> Option<String> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    let selector = selector(&SELECTOR, META_CHARSET)?;

    doc.find_first(selector)
        .and_then(|element| element.attr("charset"))
        .map(|charset| normalize_charset(&charset))
}

/// Charset declared by the first `<meta http-equiv="Content-Type">` element
pub fn charset_from_http_equiv<D: Document>(doc: &D) -> Option<String> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    let selector = selector(&SELECTOR, META_HTTP_EQUIV)?;

    doc.find_first(selector)
        .and_then(|element| element.attr("content"))
        .map(|content| charset_or_default(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::DEFAULT_CHARSET;
    use crate::dom::parse_html;
    use proptest::prelude::*;

    fn resolve(html: &str, header: &str) -> String {
        let doc = parse_html(html.as_bytes(), 1 << 20).expect("Failed to parse HTML");
        resolve_charset(&doc, header)
    }

    // ============================================================================
    // Unit Tests for Resolution Precedence
    // ============================================================================

    #[test]
    fn test_resolve_keeps_header_without_signals() {
        assert_eq!(resolve("<html><body>x</body></html>", "EUC-JP"), "EUC-JP");
    }

    #[test]
    fn test_resolve_meta_charset_overrides_header() {
        assert_eq!(
            resolve(r#"<meta charset="euc-jp">"#, DEFAULT_CHARSET),
            "EUC-JP"
        );
    }

    #[test]
    fn test_resolve_http_equiv_overrides_header() {
        let html = r#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(resolve(html, DEFAULT_CHARSET), "SHIFT_JIS");
    }

    #[test]
    fn test_resolve_meta_charset_beats_http_equiv() {
        let html = r#"<meta http-equiv="content-type" content="text/html; charset=iso-2022-jp"><meta charset="euc-jp">"#;
        assert_eq!(resolve(html, "SHIFT_JIS"), "EUC-JP");
    }

    #[test]
    fn test_resolve_first_meta_charset_wins() {
        let html = r#"<meta charset="euc-jp"><meta charset="shift_jis">"#;
        assert_eq!(resolve(html, DEFAULT_CHARSET), "EUC-JP");
    }

    #[test]
    fn test_resolve_http_equiv_without_charset_resets_to_default() {
        let html = r#"<meta http-equiv="Content-Type" content="text/html">"#;
        assert_eq!(resolve(html, "EUC-JP"), DEFAULT_CHARSET);
    }

    #[test]
    fn test_resolve_http_equiv_without_content_keeps_header() {
        let html = r#"<meta http-equiv="Content-Type">"#;
        assert_eq!(resolve(html, "EUC-JP"), "EUC-JP");
    }

    #[test]
    fn test_resolve_other_http_equiv_is_ignored() {
        let html = r#"<meta http-equiv="refresh" content="0; charset=koi8-r">"#;
        assert_eq!(resolve(html, "EUC-JP"), "EUC-JP");
    }

    #[test]
    fn test_resolve_meta_charset_in_body() {
        let html = r#"<html><body><p>late</p><meta charset="windows-1252"></body></html>"#;
        assert_eq!(resolve(html, DEFAULT_CHARSET), "WINDOWS-1252");
    }

    #[test]
    fn test_resolve_unknown_label_is_kept() {
        assert_eq!(
            resolve(r#"<meta charset="x-made-up">"#, DEFAULT_CHARSET),
            "X-MADE-UP"
        );
    }

    // ============================================================================
    // Property-Based Tests
    // ============================================================================

    proptest! {
        #[test]
        fn prop_meta_charset_always_wins(
            header in prop::sample::select(vec!["UTF-8", "EUC-JP", "SHIFT_JIS", "ISO-2022-JP"]),
            meta in prop::sample::select(vec!["utf-8", "euc-jp", "shift_jis", "iso-2022-jp", "windows-1252"]),
            equiv in prop::sample::select(vec!["utf-8", "euc-jp", "shift_jis", "iso-2022-jp", "koi8-r"]),
            equiv_first in any::<bool>(),
        ) {
            let meta_tag = format!(r#"<meta charset="{meta}">"#);
            let equiv_tag = format!(
                r#"<meta http-equiv="Content-Type" content="text/html; charset={equiv}">"#
            );
            let html = if equiv_first {
                format!("<html><head>{equiv_tag}{meta_tag}</head></html>")
            } else {
                format!("<html><head>{meta_tag}{equiv_tag}</head></html>")
            };

            prop_assert_eq!(resolve(&html, header), meta.to_uppercase());
        }

        #[test]
        fn prop_http_equiv_wins_over_header(
            header in prop::sample::select(vec!["UTF-8", "EUC-JP", "SHIFT_JIS"]),
            equiv in prop::sample::select(vec!["utf-8", "euc-jp", "shift_jis", "iso-2022-jp"]),
        ) {
            let html = format!(
                r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset={equiv}"></head></html>"#
            );
            prop_assert_eq!(resolve(&html, header), equiv.to_uppercase());
        }
    }
}
