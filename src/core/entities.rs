//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp_pos) = memchr(b'&', &input[pos..]) else {
            result.extend_from_slice(&input[pos..]);
            break;
        };

        result.extend_from_slice(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        let decoded = memchr(b';', &input[pos..]).and_then(|semi_offset| {
            decode_entity(&input[pos + 1..pos + semi_offset]).map(|c| (c, semi_offset))
        });

        match decoded {
            Some((c, semi_offset)) => {
                let mut utf8 = [0u8; 4];
                result.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                pos += semi_offset + 1;
            }
            None => {
                // Unknown entity or no semicolon, keep the ampersand
                result.push(b'&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        [b'#', rest @ ..] => decode_numeric_entity(rest),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    let codepoint = match entity {
        [b'x' | b'X', hex @ ..] => u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?,
        dec => std::str::from_utf8(dec).ok()?.parse::<u32>().ok()?,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let input = b"to reflect";
        let result = decode_text(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), b"to reflect");
    }

    #[test]
    fn test_basic_entities() {
        let input = b"&lt;radical&gt; &amp; &quot;kun&quot; &apos;";
        let result = decode_text(input);
        assert_eq!(result.as_ref(), b"<radical> & \"kun\" '");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text(b"&#26085;").as_ref(), "日".as_bytes());
        assert_eq!(decode_text(b"&#x65E5;").as_ref(), "日".as_bytes());
    }

    #[test]
    fn test_unknown_entity() {
        let result = decode_text(b"&unknown; & x");
        assert_eq!(result.as_ref(), b"&unknown; & x");
    }

    #[test]
    fn test_invalid_codepoint_kept() {
        let result = decode_text(b"&#0;");
        assert_eq!(result.as_ref(), b"&#0;");
    }
}
