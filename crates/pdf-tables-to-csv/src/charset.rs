use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Best guess at the character encoding of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedCharset {
    pub encoding: &'static str,
    pub confidence: f32,
}

/// Sniffs a byte-order mark, then checks for plain ASCII and valid UTF-8,
/// falling back to windows-1252. The result is informational only.
#[must_use]
pub fn detect_charset(bytes: &[u8]) -> DetectedCharset {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return DetectedCharset {
            encoding: encoding.name(),
            confidence: 1.0,
        };
    }

    if bytes.is_ascii() {
        return DetectedCharset {
            encoding: "ascii",
            confidence: 1.0,
        };
    }

    if Encoding::utf8_valid_up_to(bytes) == bytes.len() {
        return DetectedCharset {
            encoding: UTF_8.name(),
            confidence: 0.99,
        };
    }

    DetectedCharset {
        encoding: WINDOWS_1252.name(),
        confidence: 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::detect_charset;

    #[test]
    fn classifies_ascii_utf8_and_legacy_bytes() {
        assert_eq!(detect_charset(b"a,b\n1,2\n").encoding, "ascii");
        assert_eq!(detect_charset("café,1\n".as_bytes()).encoding, "UTF-8");
        assert_eq!(detect_charset(b"caf\xe9,1\n").encoding, "windows-1252");
        assert_eq!(detect_charset(b"\xef\xbb\xbfa,b").encoding, "UTF-8");
    }
}
