//! Metadata attributes and the validated metadata set
//!
//! Two invariants are enforced by construction rather than by convention:
//!
//! - A [`MetaAttribute`] only exists when it is *well-formed*: both the
//!   (lower-cased) name and the (trimmed) content are non-empty.
//! - A [`MetadataSet`] only ever holds *recognized* attributes, whose names
//!   start with `og:` or `twitter:`. There is no way to insert anything else.
//!
//! An empty [`MetadataSet`] is a valid result: the page simply carries no
//! social metadata.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Name prefixes of the recognized metadata vocabularies
pub const RECOGNIZED_PREFIXES: [&str; 2] = ["og:", "twitter:"];

/// A well-formed `<meta>` name/content pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaAttribute {
    name: String,
    content: String,
}

impl MetaAttribute {
    /// Build an attribute, normalizing the name to lower case and trimming
    /// surrounding whitespace from both fields
    ///
    /// Returns `None` when either field ends up empty.
    ///
    /// ```rust
    /// use site_meta::model::MetaAttribute;
    ///
    /// let attr = MetaAttribute::new("OG:Title", "  Example  ").unwrap();
    /// assert_eq!(attr.name(), "og:title");
    /// assert_eq!(attr.content(), "Example");
    ///
    /// assert!(MetaAttribute::new("og:title", "   ").is_none());
    /// ```
    pub fn new(name: &str, content: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let content = content.trim();

        if name.is_empty() || content.is_empty() {
            return None;
        }

        Some(Self {
            name,
            content: content.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the name belongs to the Open Graph or Twitter Card vocabulary
    pub fn is_recognized(&self) -> bool {
        RECOGNIZED_PREFIXES
            .iter()
            .any(|prefix| self.name.starts_with(prefix))
    }

    pub fn into_parts(self) -> (String, String) {
        (self.name, self.content)
    }
}

impl fmt::Display for MetaAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.content)
    }
}

/// Validated mapping from metadata name to content
///
/// Keys are unique and kept sorted, so two sets built from the same
/// attributes serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataSet {
    attrs: BTreeMap<String, String>,
}

impl MetadataSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a sequence of attributes into a set
    ///
    /// Unrecognized attributes are dropped. When a name repeats, the later
    /// occurrence wins.
    pub fn from_attributes<I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = MetaAttribute>,
    {
        let mut set = Self::new();
        for attr in attrs {
            set.insert(attr);
        }
        set
    }

    /// Insert a recognized attribute, replacing any previous value
    ///
    /// Returns `false` (and leaves the set untouched) if the attribute is not
    /// recognized.
    pub fn insert(&mut self, attr: MetaAttribute) -> bool {
        if !attr.is_recognized() {
            return false;
        }

        let (name, content) = attr.into_parts();
        self.attrs.insert(name, content);
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.attrs
    }
}

impl<'a> IntoIterator for &'a MetadataSet {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl fmt::Display for MetadataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, content)) in self.attrs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name} - {content}")?;
        }
        Ok(())
    }
}
