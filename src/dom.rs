//! HTML document parsing and element lookup
//!
//! Extraction and charset resolution only ever need three things from a
//! document: find the first element matching a selector, find all of them
//! in document order, and read an attribute. Those are captured by the
//! [`Document`] and [`Element`] traits so the parsing backend can change
//! without touching extraction logic.
//!
//! The backend is `scraper`: html5ever's WHATWG parser builds a
//! [`scraper::Html`] tree, and CSS selectors are compiled with
//! [`Selector::parse`]. Attribute values that must match regardless of case
//! use the `i` flag, e.g. `meta[http-equiv="content-type" i]`.
//!
//! ```rust
//! use site_meta::dom::{parse_html, Document, Element, Selector};
//!
//! let doc = parse_html(b"<meta charset=\"euc-jp\"><meta name=\"a\">", 1024).unwrap();
//! let selector = Selector::parse("meta[charset]").unwrap();
//! let meta = doc.find_first(&selector).unwrap();
//! assert_eq!(meta.attr("charset").as_deref(), Some("euc-jp"));
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use scraper::{ElementRef, Html};

pub use scraper::Selector;

use crate::encoding::carry;
use crate::error::SiteMetaError;

/// Lookup capability over a parsed document
pub trait Document {
    type Element<'a>: Element
    where
        Self: 'a;

    /// First matching element in document order
    fn find_first(&self, selector: &Selector) -> Option<Self::Element<'_>>;

    /// Every matching element in document order
    fn find_all(&self, selector: &Selector) -> Vec<Self::Element<'_>>;
}

/// Attribute access on a found element
pub trait Element {
    /// Value of the named attribute, if present (possibly empty)
    fn attr(&self, name: &str) -> Option<String>;
}

impl Document for Html {
    type Element<'a> = ElementRef<'a>;

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.select(selector).next()
    }

    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.select(selector).collect()
    }
}

impl Element for ElementRef<'_> {
    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Parse a response body into a document
///
/// Any byte sequence is accepted: html5ever recovers from malformed markup
/// and the body is carried losslessly, whatever its encoding. Attribute
/// values are carrier text (see [`crate::encoding`]) until they are
/// transcoded with the resolved charset.
///
/// # Errors
///
/// `SiteMetaError::Parse` if the body is larger than `max_bytes`.
pub fn parse_html(body: &[u8], max_bytes: usize) -> Result<Html, SiteMetaError> {
    if body.len() > max_bytes {
        return Err(SiteMetaError::Parse(format!(
            "document exceeds {max_bytes} bytes"
        )));
    }

    let text = carry(body);
    Ok(parse_document(Html::new_document(), Default::default()).one(text))
}
