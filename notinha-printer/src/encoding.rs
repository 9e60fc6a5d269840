//! Latin-1 text encoding for thermal printers
//!
//! The printer is switched to code table 16 (WPC1252), so text is encoded
//! with Windows-1252. Every encoded character occupies exactly one byte and
//! one printed column, which keeps the width helpers simple:
//! - Encoding UTF-8 text, replacing unrepresentable characters with `?`
//! - Measuring, truncating and padding strings by printed width

/// Replacement byte for characters outside the code page
const REPLACEMENT: u8 = b'?';

/// Encode text for the printer
///
/// Characters that Windows-1252 cannot represent are replaced one by one
/// with `?`; the rest of the text is kept.
pub fn encode_text(s: &str) -> Vec<u8> {
    if s.is_ascii() {
        return s.as_bytes().to_vec();
    }

    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors {
            out.push(REPLACEMENT);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

/// Printed width of a string in columns
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` columns
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad with trailing spaces up to `width`. Longer input is returned as is.
pub fn pad_right(s: &str, width: usize) -> String {
    let current = text_width(s);
    if current >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - current))
}

/// Pad with leading spaces up to `width`. Longer input is returned as is.
pub fn pad_left(s: &str, width: usize) -> String {
    let current = text_width(s);
    if current >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - current), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_text("Pedido: #12"), b"Pedido: #12".to_vec());
    }

    #[test]
    fn test_encode_latin_accents() {
        // Windows-1252: ç = 0xE7, ã = 0xE3, é = 0xE9
        assert_eq!(encode_text("açúcar"), vec![b'a', 0xE7, 0xFA, b'c', b'a', b'r']);
        assert_eq!(encode_text("pão"), vec![b'p', 0xE3, b'o']);
        assert_eq!(encode_text("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_encode_replaces_unmappable_per_char() {
        assert_eq!(encode_text("a你b"), b"a?b".to_vec());
        assert_eq!(encode_text("你好"), b"??".to_vec());
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("hello"), 5);
        assert_eq!(text_width("feijão"), 6);
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("feijão tropeiro", 6), "feijão");
        assert_eq!(truncate_width("abc", 0), "");
        assert_eq!(truncate_width("abc", 10), "abc");
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_right("hi", 5), "hi   ");
        assert_eq!(pad_left("hi", 5), "   hi");
        assert_eq!(pad_right("pão", 5), "pão  ");
        // Never truncates
        assert_eq!(pad_right("hello world", 5), "hello world");
        assert_eq!(pad_left("hello world", 5), "hello world");
    }
}
