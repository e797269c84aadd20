//! Text decoding for fetched sheet exports
//!
//! Spreadsheet services usually send UTF-8, sometimes with a BOM, and
//! occasionally declare another charset in the `Content-Type` header.

use encoding_rs::{Encoding, UTF_8};

/// Pick the encoding for a payload: BOM first, then the declared charset, then UTF-8
pub fn detect_encoding(data: &[u8], declared_charset: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }

    declared_charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode bytes to text, replacing malformed sequences and dropping any BOM
pub fn decode_text(data: &[u8], declared_charset: Option<&str>) -> String {
    let encoding = detect_encoding(data, declared_charset);
    let (text, used, had_errors) = encoding.decode(data);
    if had_errors {
        tracing::warn!("Malformed {} sequences replaced while decoding", used.name());
    }
    text.into_owned()
}

/// Extract the `charset=` parameter from a `Content-Type` value
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped() {
        let data = [&[0xEF, 0xBB, 0xBF][..], "Title\nA".as_bytes()].concat();
        assert_eq!(decode_text(&data, None), "Title\nA");
    }

    #[test]
    fn test_declared_charset_is_used() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode("Caf\u{e9}");
        assert_eq!(decode_text(&bytes, Some("windows-1252")), "Caf\u{e9}");
    }

    #[test]
    fn test_unknown_charset_falls_back_to_utf8() {
        assert_eq!(detect_encoding(b"abc", Some("no-such-charset")), UTF_8);
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/csv; charset=\"utf-8\""),
            Some("utf-8")
        );
        assert_eq!(charset_from_content_type("text/csv"), None);
    }
}
