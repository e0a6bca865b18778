//! Meta tag extraction
//!
//! Walks the document for `<meta name=...>` and `<meta property=...>`
//! elements, in document order, and turns each into a name/content
//! candidate. Open Graph uses `property=`, Twitter Cards use `name=`, and
//! plenty of sites mix them up, so both are read.
//!
//! Candidates are still in carrier form (see [`crate::encoding`]); they are
//! validated against the `og:`/`twitter:` vocabularies only after
//! conversion to UTF-8.

use std::sync::OnceLock;

use crate::dom::{Document, Element, Selector};

const META_SELECTOR: &str = "meta[name], meta[property]";

/// A well-formed but not yet transcoded name/content pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// Trimmed value of `name=` (preferred) or `property=`, case folded
    /// only after conversion
    pub name: String,
    /// Trimmed value of `content=`
    pub content: String,
}

/// Extract every well-formed meta candidate, in document order
///
/// Elements with an empty name or content are skipped. Duplicates are
/// kept; the later one wins when the candidates are folded into a
/// [`MetadataSet`](crate::model::MetadataSet).
///
/// ```rust
/// use site_meta::dom::parse_html;
/// use site_meta::extract::extract_candidates;
///
/// let doc = parse_html(br#"<meta property="OG:Type" content=" video.movie ">"#, 1024).unwrap();
/// let candidates = extract_candidates(&doc);
/// assert_eq!(candidates[0].name, "OG:Type");
/// assert_eq!(candidates[0].content, "video.movie");
/// ```
pub fn extract_candidates<D: Document>(doc: &D) -> Vec<RawAttribute> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    let Some(selector) = SELECTOR
        .get_or_init(|| Selector::parse(META_SELECTOR).ok())
        .as_ref()
    else {
        return Vec::new();
    };

    let elements = doc.find_all(selector);
    let candidates: Vec<RawAttribute> = elements.iter().filter_map(candidate).collect();

    tracing::debug!(
        elements = elements.len(),
        candidates = candidates.len(),
        "extracted meta candidates"
    );

    candidates
}

fn candidate<E: Element>(element: &E) -> Option<RawAttribute> {
    let name = element.attr("name").or_else(|| element.attr("property"))?;
    let content = element.attr("content").unwrap_or_default();

    // Still carrier text; case folding happens after conversion
    let name = name.trim();
    let content = content.trim();

    if name.is_empty() || content.is_empty() {
        return None;
    }

    Some(RawAttribute {
        name: name.to_string(),
        content: content.to_string(),
    })
}
