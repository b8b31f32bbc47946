//! Byte input decoding.
//!
//! Picks the character encoding of raw page bytes from a byte order mark
//! or a charset declaration near the top of the markup, then decodes to
//! UTF-8 with `encoding_rs`.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// Charset declarations are only looked for in this many leading bytes.
const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]+?charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i-u)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([A-Za-z0-9_:.\-]+)"#,
    )
    .expect("valid regex")
});

/// Where the encoding decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    ByteOrderMark,
    MetaCharset,
    HttpEquiv,
    Default,
}

/// Decoded markup plus what was learned while decoding it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub html: String,
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
    /// Some byte sequences were malformed and replaced with U+FFFD.
    pub had_errors: bool,
}

/// Detect the encoding of page bytes. Falls back to UTF-8.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, EncodingSource::ByteOrderMark);
    }

    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let declared = |re: &Regex| {
        re.captures(head)
            .and_then(|c| c.get(1))
            .and_then(|m| Encoding::for_label(m.as_bytes()))
    };

    // The meta charset pattern also matches inside http-equiv content.
    if let Some(encoding) = declared(&HTTP_EQUIV_CHARSET) {
        return (encoding, EncodingSource::HttpEquiv);
    }
    if let Some(encoding) = declared(&META_CHARSET) {
        return (encoding, EncodingSource::MetaCharset);
    }
    (UTF_8, EncodingSource::Default)
}

/// Decode page bytes to UTF-8, replacing malformed sequences.
///
/// # Examples
///
/// ```
/// use rs_page_reader::encoding::decode_html;
///
/// let decoded = decode_html(b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>");
/// assert!(decoded.html.contains("café"));
/// assert!(!decoded.had_errors);
/// ```
#[must_use]
pub fn decode_html(bytes: &[u8]) -> Decoded {
    let (encoding, source) = detect_encoding(bytes);
    // `decode` strips a BOM and honours it over the detected encoding.
    let (html, used, had_errors) = encoding.decode(bytes);
    Decoded {
        html: html.into_owned(),
        encoding: used,
        source,
        had_errors,
    }
}
