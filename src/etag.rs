//! ETag generation for metadata results using BLAKE3
//!
//! The serving adapter tags every successful `/api/meta` response with a
//! strong ETag derived from the [`MetadataSet`] alone, so re-running the
//! pipeline on byte-identical input yields the same tag.
//!
//! # Algorithm
//!
//! 1. Feed every entry, in key order, into a BLAKE3 hasher as
//!    length-prefixed name and content bytes
//! 2. Take the first 128 bits (16 bytes) of the hash
//! 3. Encode as hexadecimal and wrap in double quotes (RFC 9110)
//!
//! Length prefixes keep `{"og:a": "bc"}` and `{"og:ab": "c"}` apart.
//!
//! # Example
//!
//! ```
//! use site_meta::etag::ETagGenerator;
//! use site_meta::model::{MetaAttribute, MetadataSet};
//!
//! let meta = MetadataSet::from_attributes(MetaAttribute::new("og:title", "Hello"));
//! let etag = ETagGenerator::new().generate(&meta);
//!
//! assert!(etag.starts_with('"'));
//! assert_eq!(etag.len(), 34); // 32 hex chars + 2 quotes
//! ```

use crate::model::MetadataSet;

/// ETag generator using BLAKE3 hash
#[derive(Debug, Clone, Copy)]
pub struct ETagGenerator;

impl ETagGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a strong ETag for a metadata set
    pub fn generate(&self, meta: &MetadataSet) -> String {
        let mut hasher = blake3::Hasher::new();
        for (name, content) in meta.iter() {
            hasher.update(&(name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update(&(content.len() as u64).to_le_bytes());
            hasher.update(content.as_bytes());
        }
        let hash = hasher.finalize();

        format!("\"{}\"", hex::encode(&hash.as_bytes()[..16]))
    }
}

impl Default for ETagGenerator {
    fn default() -> Self {
        Self::new()
    }
}
