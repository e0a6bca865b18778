//! Source-encoding normalization
//!
//! The document has to be parsed before its final charset is known (the
//! charset may be declared *inside* it), so the raw body cannot be decoded
//! up front. Instead the body is handed to the parser through a lossless
//! byte carrier, and attribute values are decoded only once the charset has
//! been resolved.
//!
//! # Byte carrier
//!
//! The body is decoded as `x-user-defined`: bytes `0x00..=0x7F` map to
//! ASCII and bytes `0x80..=0xFF` map to `U+F780..=U+F7FF`. Every byte
//! sequence decodes, markup (which is ASCII) parses normally, and every
//! attribute value can be turned back into its original bytes. Characters
//! outside the carrier range can still appear in attribute values (from
//! character references such as `&eacute;`, or `U+FFFD` substituted for NUL);
//! those are already Unicode and pass through unchanged.
//!
//! The carrier assumes the charset keeps markup bytes out of its multi-byte
//! sequences, which holds for UTF-8, EUC-JP, Shift_JIS and the single-byte
//! charsets. ISO-2022-JP does not: a JIS character whose bytes include
//! `0x22` (`"`), `0x26` (`&`) or `0x3E` (`>`) is read by the tokenizer as
//! markup. An attribute value containing such a character comes out cut
//! short or altered, and may then fail conversion.
//!
//! # Conversion
//!
//! [`Transcoder`] converts carrier text to UTF-8:
//!
//! - the canonical default label (`UTF-8`) is the identity: bytes are taken
//!   as UTF-8 as they are, with malformed sequences replaced
//! - any other label must be known to `encoding_rs`, and every byte run must
//!   be valid in it, otherwise the whole conversion fails

use encoding_rs::{Encoding, X_USER_DEFINED};

use crate::content_type::DEFAULT_CHARSET;
use crate::error::SiteMetaError;
use crate::extract::RawAttribute;
use crate::model::MetaAttribute;

const CARRIER_START: u32 = 0xF780;
const CARRIER_END: u32 = 0xF7FF;

/// Decode raw body bytes into carrier text for parsing
pub fn carry(bytes: &[u8]) -> String {
    let (text, _) = X_USER_DEFINED.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// The original byte of a carrier character, if it is one
fn carried_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    if ch.is_ascii() {
        Some(code as u8)
    } else if (CARRIER_START..=CARRIER_END).contains(&code) {
        Some((code - CARRIER_START + 0x80) as u8)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Identity,
    Decode(&'static Encoding),
}

/// Converts carrier text from a resolved source charset to UTF-8
#[derive(Debug, Clone)]
pub struct Transcoder {
    label: String,
    mode: Mode,
}

impl Transcoder {
    /// Look up the conversion for a resolved charset label
    ///
    /// # Errors
    ///
    /// `SiteMetaError::Encoding` if the label is not a known encoding.
    ///
    /// ```rust
    /// use site_meta::encoding::Transcoder;
    ///
    /// assert!(Transcoder::for_label("EUC-JP").is_ok());
    /// assert!(Transcoder::for_label("INVALIDENCODING").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self, SiteMetaError> {
        if label == DEFAULT_CHARSET {
            return Ok(Self {
                label: label.to_string(),
                mode: Mode::Identity,
            });
        }

        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            SiteMetaError::Encoding(format!("unsupported charset '{label}'"))
        })?;

        Ok(Self {
            label: label.to_string(),
            mode: Mode::Decode(encoding),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether conversion is a no-op for this label
    pub fn is_identity(&self) -> bool {
        matches!(self.mode, Mode::Identity)
    }

    /// Convert one carrier string to UTF-8
    ///
    /// # Errors
    ///
    /// `SiteMetaError::Encoding` if a byte run is malformed in the source
    /// charset. Identity conversion never fails.
    pub fn transcode(&self, carried: &str) -> Result<String, SiteMetaError> {
        let mut out = String::with_capacity(carried.len());
        let mut pending = Vec::new();

        for ch in carried.chars() {
            match carried_byte(ch) {
                Some(byte) => pending.push(byte),
                None => {
                    self.flush(&mut pending, &mut out)?;
                    out.push(ch);
                }
            }
        }
        self.flush(&mut pending, &mut out)?;

        Ok(out)
    }

    fn flush(&self, pending: &mut Vec<u8>, out: &mut String) -> Result<(), SiteMetaError> {
        if pending.is_empty() {
            return Ok(());
        }

        match self.mode {
            Mode::Identity => out.push_str(&String::from_utf8_lossy(pending)),
            Mode::Decode(encoding) => {
                let decoded = encoding
                    .decode_without_bom_handling_and_without_replacement(pending)
                    .ok_or_else(|| {
                        SiteMetaError::Encoding(format!(
                            "invalid byte sequence for charset '{}'",
                            self.label
                        ))
                    })?;
                out.push_str(&decoded);
            }
        }

        pending.clear();
        Ok(())
    }
}

/// Convert extracted candidates from `label` to UTF-8 attributes
///
/// Both name and content of every candidate are converted. The first
/// failure aborts the whole conversion, so a caller never sees a
/// partially converted result. Candidates whose fields become empty after
/// conversion and trimming are dropped.
pub fn normalize(
    label: &str,
    candidates: Vec<RawAttribute>,
) -> Result<Vec<MetaAttribute>, SiteMetaError> {
    let transcoder = Transcoder::for_label(label)?;
    tracing::debug!(
        charset = transcoder.label(),
        identity = transcoder.is_identity(),
        candidates = candidates.len(),
        "normalizing encoding"
    );

    let mut attrs = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let name = transcoder.transcode(&candidate.name)?;
        let content = transcoder.transcode(&candidate.content)?;
        if let Some(attr) = MetaAttribute::new(&name, &content) {
            attrs.push(attr);
        }
    }

    Ok(attrs)
}
