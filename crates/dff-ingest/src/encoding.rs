//! Text decoding with a legacy 8-bit fallback.
//!
//! Annotation exports from older tools are frequently ISO-8859-1. Content is
//! decoded as UTF-8 first and only falls back when that fails.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::WINDOWS_1252;

/// Encoding a text input was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1, decoded through its WHATWG mapping (windows-1252).
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Latin1 => f.write_str("ISO-8859-1"),
        }
    }
}

/// Decodes `bytes` as UTF-8, falling back to ISO-8859-1.
///
/// A leading UTF-8 byte-order mark is dropped. Returns `None` when neither
/// encoding accepts the input.
pub fn decode_text(bytes: Vec<u8>) -> Option<(String, TextEncoding)> {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let text = match text.strip_prefix('\u{feff}') {
                Some(stripped) => stripped.to_string(),
                None => text,
            };
            Some((text, TextEncoding::Utf8))
        }
        Err(err) => {
            let bytes = err.into_bytes();
            WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(&bytes)
                .map(Cow::into_owned)
                .map(|text| (text, TextEncoding::Latin1))
        }
    }
}
