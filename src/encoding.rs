//! Byte/text conversion for wire data.
//!
//! IRC allows arbitrary byte content in a message's suffix, so decoding must never fail: a
//! conforming peer that sends mis-encoded bytes should still produce *something* readable rather
//! than crash the client.

use encoding_rs::Encoding;

/// Converts text or byte-like input into an owned byte buffer.
///
/// Rust's type system already distinguishes text from bytes, so unlike the dynamically-typed
/// original there is no failure case here: anything that implements this trait is, by
/// construction, already one or the other.
pub trait IntoIrcBytes {
    fn into_irc_bytes(self) -> Vec<u8>;
}

impl IntoIrcBytes for &str {
    fn into_irc_bytes(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl IntoIrcBytes for String {
    fn into_irc_bytes(self) -> Vec<u8> {
        self.into_bytes()
    }
}

impl IntoIrcBytes for &[u8] {
    fn into_irc_bytes(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl IntoIrcBytes for Vec<u8> {
    fn into_irc_bytes(self) -> Vec<u8> {
        self
    }
}

/// Converts `x` to bytes via [`IntoIrcBytes`]. A thin wrapper kept around so call sites read the
/// same as the wire-format spec this module implements.
pub fn to_bytes(x: impl IntoIrcBytes) -> Vec<u8> {
    x.into_irc_bytes()
}

/// Decodes `bytes` as text, trying each of `expected` in order before falling back to a
/// byte-preserving heuristic.
///
/// Each candidate in `expected` is tried with a strict decode (one that rejects invalid
/// sequences); the first clean decode wins. If none of them decode cleanly, valid UTF-8 is
/// preferred outright, and otherwise the bytes are decoded as Windows-1252 — a practical stand-in
/// for "Latin-1 with byte preservation" since every byte maps to some code point, so this step
/// cannot fail.
pub fn to_unicode(bytes: &[u8], expected: &[&'static Encoding]) -> String {
    for encoding in expected {
        let (cow, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return cow.into_owned();
        }
    }

    if let Ok(s) = core::str::from_utf8(bytes) {
        return s.to_string();
    }

    let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    cow.into_owned()
}

/// [`to_unicode`] with the default encoding list (`UTF-8` alone).
pub fn to_unicode_default(bytes: &[u8]) -> String {
    to_unicode(bytes, &[encoding_rs::UTF_8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_round_trips() {
        assert_eq!(to_unicode_default("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        // 0xE9 is 'é' in Windows-1252 but not valid standalone UTF-8.
        let bytes = [b'h', 0xE9, b'i'];
        assert_eq!(to_unicode_default(&bytes), "h\u{e9}i");
    }

    #[test]
    fn to_bytes_covers_str_and_bytes() {
        assert_eq!(to_bytes("hi"), b"hi".to_vec());
        assert_eq!(to_bytes(b"hi".as_slice()), b"hi".to_vec());
        assert_eq!(to_bytes(String::from("hi")), b"hi".to_vec());
        assert_eq!(to_bytes(vec![1u8, 2, 3]), vec![1u8, 2, 3]);
    }
}
