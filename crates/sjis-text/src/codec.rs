//! Legacy double-byte codec used by every hook that receives raw engine bytes.

use encoding_rs::{EncoderResult, SHIFT_JIS};

/// Conversion between the engine's legacy encoding and Rust strings.
///
/// Both directions are total: undecodable input becomes U+FFFD and
/// unrepresentable characters are encoded as `?`.
pub trait LegacyCodec {
    fn decode(&self, bytes: &[u8]) -> String;
    fn encode(&self, text: &str) -> Vec<u8>;

    /// Decode a single character, `'\0'` for empty input.
    fn decode_char(&self, bytes: &[u8]) -> char {
        self.decode(bytes).chars().next().unwrap_or('\0')
    }
}

/// Shift-JIS (WHATWG flavour) backed by `encoding_rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShiftJisCodec;

impl LegacyCodec for ShiftJisCodec {
    fn decode(&self, bytes: &[u8]) -> String {
        let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
        let (text, _) = SHIFT_JIS.decode_without_bom_handling(&bytes[..end]);
        text.into_owned()
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        let mut encoder = SHIFT_JIS.new_encoder();
        let mut out = Vec::with_capacity(text.len() + 8);
        let mut src = text;
        loop {
            let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(src, &mut out, true);
            src = &src[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => out.reserve(src.len() * 2 + 8),
                EncoderResult::Unmappable(_) => out.push(b'?'),
            }
        }
        out
    }
}

/// A character code as the engine passes it: up to four bytes packed into an
/// integer, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedChar {
    bytes: [u8; 4],
    len: usize,
}

impl PackedChar {
    pub fn unpack(mut code: u32) -> Self {
        let mut bytes = [0u8; 4];
        let mut len = 0;
        while code != 0 && len < 4 {
            bytes[len] = (code & 0xFF) as u8;
            code >>= 8;
            len += 1;
        }
        bytes[..len].reverse();
        Self { bytes, len }
    }

    pub fn from_bytes(raw: &[u8]) -> Self {
        let len = raw.len().min(4);
        let mut bytes = [0u8; 4];
        bytes[..len].copy_from_slice(&raw[..len]);
        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn code(&self) -> u32 {
        self.as_bytes().iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    }

    /// First byte, used by the placeholder substitution rules.
    pub fn lead(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    pub fn is_single_byte(&self) -> bool {
        self.len == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn decodes_ascii_and_kana() {
        let codec = ShiftJisCodec;
        assert_eq!(codec.decode(b"Hello"), "Hello");
        assert_eq!(codec.decode(&[0x82, 0xA0]), "あ");
        assert_eq!(codec.decode(&[0xB1]), "ｱ");
    }

    #[test]
    fn decode_stops_at_terminator() {
        let codec = ShiftJisCodec;
        assert_eq!(codec.decode(b"ab\0cd"), "ab");
    }

    #[test]
    fn decode_is_total() {
        let codec = ShiftJisCodec;
        // Lone lead byte at the end of input.
        let text = codec.decode(&[b'a', 0x82]);
        assert!(text.starts_with('a'));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn unrepresentable_encodes_as_question_mark() {
        let codec = ShiftJisCodec;
        assert_eq!(codec.encode("a\u{1F600}b"), b"a?b");
    }

    #[test]
    fn packed_char_is_high_byte_first() {
        let packed = PackedChar::unpack(0x82A0);
        assert_eq!(packed.as_bytes(), &[0x82, 0xA0]);
        assert_eq!(packed.code(), 0x82A0);
        assert_eq!(PackedChar::unpack(0x57).as_bytes(), b"W");
        assert!(PackedChar::unpack(0).as_bytes().is_empty());
        assert_eq!(PackedChar::from_bytes(&[0x82, 0xA0]), packed);
    }

    #[test]
    fn representable_bytes_survive_round_trip() {
        let codec = ShiftJisCodec;
        let alphabet: Vec<char> = "abcXYZ019 !?.,<>/|ｱｲｵｶﾝあいうえおかきくけこアイウエオ漢字日本語"
            .chars()
            .collect();
        let mut rng = rand::rng();

        for _ in 0..200 {
            let len = rng.random_range(0..40);
            let text: String = (0..len)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                .collect();
            let bytes = codec.encode(&text);
            assert_eq!(codec.encode(&codec.decode(&bytes)), bytes, "text: {text}");
        }
    }
}
