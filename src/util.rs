//! Text escaping and input decoding helpers.

use std::borrow::Cow;

/// Escape text content for HTML (`&`, `<`, `>`).
///
/// Returns the input unchanged (no allocation) when nothing needs escaping.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if memchr::memchr3(b'&', b'<', b'>', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    Cow::Owned(escape_chars(s))
}

/// Escape a double-quoted attribute value (`&`, `"`, `<`, `>`).
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if memchr::memchr3(b'&', b'<', b'>', bytes).is_none() && memchr::memchr(b'"', bytes).is_none()
    {
        return Cow::Borrowed(s);
    }
    Cow::Owned(escape_chars(s))
}

fn escape_chars(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Decode raw document bytes to a string.
///
/// This function:
/// 1. Honours a byte order mark (UTF-8 or UTF-16)
/// 2. Tries UTF-8
/// 3. If malformed, tries the `<meta charset>` declared in the first 1024 bytes
/// 4. Falls back to Windows-1252 (superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(label) = sniff_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find a `charset=` declaration in the document prelude.
///
/// Covers both `<meta charset="x">` and
/// `<meta http-equiv="Content-Type" content="text/html; charset=x">`.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let prelude = &bytes[..bytes.len().min(1024)];
    let lower = prelude.to_ascii_lowercase();
    let start = memchr::memmem::find(&lower, b"charset=")? + b"charset=".len();

    let label: String = lower[start..]
        .iter()
        .skip_while(|&&b| b == b'"' || b == b'\'' || b == b' ')
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
        .map(|&b| b as char)
        .collect();

    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("Hello"), "Hello");
        assert!(matches!(escape_text("Hello"), Cow::Borrowed(_)));
        assert_eq!(escape_text("<script>"), "&lt;script&gt;");
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_text("it's"), "it's");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"Say "hi""#), "Say &quot;hi&quot;");
        assert_eq!(escape_attr("a<b"), "a&lt;b");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_html("Joy of Pets".as_bytes()), "Joy of Pets");
        assert_eq!(decode_html(b"\xEF\xBB\xBFcaf\xC3\xA9"), "café");
    }

    #[test]
    fn test_decode_meta_charset() {
        let bytes = b"<meta charset=\"iso-8859-2\"><p>\xB1</p>";
        assert!(decode_html(bytes).contains('ą'));
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        assert_eq!(decode_html(b"caf\xE9"), "café");
    }
}
