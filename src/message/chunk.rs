use std::collections::VecDeque;

use crate::{
    constants::{self, MAX_LINE_LENGTH},
    message::outbound::{build_message, BuildError, OutboundMessage},
};

/// Splits `message` into line-terminator-delimited pieces, native to how `str::lines` and friends
/// treat CR, LF, and CRLF, without collapsing consecutive terminators into one split.
fn split_lines(message: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = message.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&message[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                lines.push(&message[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    // Only emit a final piece if the input didn't end exactly on a terminator — matches
    // `str.splitlines()`, which doesn't yield a trailing empty element for `"hello\n"` and
    // yields nothing at all for `""`.
    if start < bytes.len() {
        lines.push(&message[start..]);
    }
    lines
}

/// Finds the last space at a byte offset that keeps the emitted head (offset + 1 bytes, since the
/// space is kept on the head) within `max_length`.
fn rfind_fitting_space(bytes: &[u8], max_length: usize) -> Option<usize> {
    if max_length == 0 {
        return None;
    }
    let search_end = bytes.len().min(max_length);
    bytes[..search_end].iter().rposition(|&b| b == b' ')
}

/// Finds the largest prefix length `<= max_length` that does not bisect a UTF-8 code point, by
/// inspecting the last four bytes of the `max_length`-byte candidate slice.
fn safe_utf8_cut(bytes: &[u8], max_length: usize) -> usize {
    let window = &bytes[max_length - 4..max_length];
    let (b1, b2, b3, b4) = (window[0], window[1], window[2], window[3]);

    let offset = if b4 >> 7 == 0b0
        || b3 >> 5 == 0b110
        || b2 >> 4 == 0b1110
        || b1 >> 3 == 0b11110
    {
        // the last character in the candidate slice does not cross the boundary.
        0
    } else if b4 >> 6 == 0b11 {
        // b4 begins a character that crosses the boundary.
        1
    } else if b3 >> 5 == 0b111 {
        // b3 begins a character that crosses the boundary.
        2
    } else {
        // b2 must begin a 4-byte character crossing the boundary.
        3
    };

    max_length - offset
}

/// Chunks `message` into byte buffers that each fit in `max_length` bytes when UTF-8 encoded,
/// splitting first on line terminators, then on the last word boundary that fits, then (if no
/// word boundary fits) on the last clean UTF-8 character boundary that fits.
///
/// Every emitted chunk decodes losslessly as UTF-8; concatenating the decoded chunks reproduces
/// `message` with its line terminators stripped.
pub fn chunk_message(message: &str, max_length: usize) -> Vec<Vec<u8>> {
    let mut output = Vec::new();
    let mut pending: VecDeque<String> = split_lines(message).into_iter().map(String::from).collect();

    while let Some(line) = pending.pop_front() {
        let line_bytes = line.as_bytes();
        if line_bytes.len() <= max_length {
            output.push(line_bytes.to_vec());
            continue;
        }

        if let Some(space) = rfind_fitting_space(line_bytes, max_length) {
            let head = line_bytes[..=space].to_vec();
            // the byte immediately after an ASCII space is always a code point boundary.
            let tail = String::from_utf8(line_bytes[space + 1..].to_vec())
                .expect("splitting after a space cannot bisect a UTF-8 code point");
            output.push(head);
            pending.push_front(tail);
            continue;
        }

        let cut = safe_utf8_cut(line_bytes, max_length);
        let tail = String::from_utf8(line_bytes[cut..].to_vec())
            .expect("safe_utf8_cut returns a clean UTF-8 boundary");
        output.push(line_bytes[..cut].to_vec());
        pending.push_front(tail);
    }

    output
}

/// Builds one or more `PRIVMSG target :…` lines for `message`, splitting it so that the whole
/// on-wire frame the server relays — including the `nick!ident@host` mask the server prepends —
/// stays under the 512-byte line limit.
///
/// `mask_length` defaults to 100 (a safe upper bound in practice) when unknown. `third_person`
/// wraps each line in the CTCP ACTION framing used for `/me`-style messages.
pub fn make_privmsgs(
    target: &str,
    message: &str,
    third_person: bool,
    mask_length: Option<usize>,
) -> Result<Vec<OutboundMessage>, BuildError> {
    let mask_length = mask_length.unwrap_or(100);

    // Three spaces, two colons, CR, and LF makes 7:
    //     :mask PRIVMSG target :message\r\n
    let mut overhead = mask_length + constants::PRIVMSG.len() + target.len() + 7;
    if third_person {
        overhead += constants::ACTION_START.len() + constants::ACTION_END.len();
    }
    let max_length = MAX_LINE_LENGTH.saturating_sub(overhead);

    chunk_message(message, max_length)
        .into_iter()
        .map(|mut line| {
            if third_person {
                let mut wrapped = Vec::with_capacity(
                    constants::ACTION_START.len() + line.len() + constants::ACTION_END.len(),
                );
                wrapped.extend_from_slice(constants::ACTION_START);
                wrapped.append(&mut line);
                wrapped.extend_from_slice(constants::ACTION_END);
                line = wrapped;
            }
            build_message(constants::PRIVMSG, &[target], line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_all(chunks: &[Vec<u8>]) -> String {
        chunks
            .iter()
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect()
    }

    #[test]
    fn short_message_is_one_chunk() {
        let chunks = chunk_message("hello", 100);
        assert_eq!(chunks, vec![b"hello".to_vec()]);
    }

    #[test]
    fn splits_on_line_terminators() {
        let chunks = chunk_message("A\rB\nC\r\nD", 100);
        assert_eq!(chunks, vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec(), b"D".to_vec()]);
    }

    #[test]
    fn trailing_terminator_does_not_yield_an_extra_empty_chunk() {
        assert_eq!(chunk_message("hello\n", 100), vec![b"hello".to_vec()]);
    }

    #[test]
    fn empty_message_yields_no_chunks() {
        assert!(chunk_message("", 100).is_empty());
        assert!(make_privmsgs("#c", "", false, None).unwrap().is_empty());
    }

    #[test]
    fn splits_on_word_boundary_when_it_fits() {
        let chunks = chunk_message("hello there world", 11);
        for chunk in &chunks {
            assert!(chunk.len() <= 11, "{chunk:?} exceeds max_length");
        }
        assert_eq!(decode_all(&chunks), "hello there world");
    }

    #[test]
    fn splits_at_clean_utf8_boundary_when_no_space_fits() {
        let chunks = chunk_message("øøøøøøøøøø", 5);
        for chunk in &chunks {
            assert!(chunk.len() <= 5);
            assert!(std::str::from_utf8(chunk).is_ok());
        }
        assert_eq!(decode_all(&chunks), "øøøøøøøøøø");
    }

    #[test]
    fn every_chunk_respects_max_length_for_varied_inputs() {
        let samples = [
            "a simple ascii sentence that goes on for a while",
            "日本語のテキストです。これは複数バイト文字です。",
            "mixed ascii and 日本語 and emoji 🎉🎉🎉 text",
            "",
        ];
        for sample in samples {
            for max_length in [4usize, 5, 7, 10, 20] {
                let chunks = chunk_message(sample, max_length);
                for chunk in &chunks {
                    assert!(chunk.len() <= max_length);
                    assert!(std::str::from_utf8(chunk).is_ok());
                }
            }
        }
    }

    #[test]
    fn privmsg_fits_in_one_line_with_unknown_mask() {
        let msgs = make_privmsgs("#c", "Hello", false, None).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].as_bytes(), b"PRIVMSG #c :Hello\r\n");
    }

    #[test]
    fn privmsg_splits_on_embedded_line_terminators() {
        let msgs = make_privmsgs("#c", "A\rB\nC", false, None).unwrap();
        let bufs: Vec<&[u8]> = msgs.iter().map(|m| m.as_bytes()).collect();
        assert_eq!(
            bufs,
            vec![
                b"PRIVMSG #c :A\r\n".as_slice(),
                b"PRIVMSG #c :B\r\n".as_slice(),
                b"PRIVMSG #c :C\r\n".as_slice(),
            ]
        );
    }

    #[test]
    fn privmsg_long_payload_splits_under_known_mask() {
        let payload = "a".repeat(700);
        let msgs = make_privmsgs("#c", &payload, false, Some(27)).unwrap();
        assert!(msgs.len() >= 2);

        let mut reconstructed = Vec::new();
        for msg in &msgs {
            let bytes = msg.as_bytes();
            assert!(bytes.len() <= 512);
            let suffix_start = bytes.windows(2).position(|w| w == b" :").unwrap() + 2;
            let suffix = &bytes[suffix_start..bytes.len() - 2];
            reconstructed.extend_from_slice(suffix);
        }
        assert_eq!(reconstructed, payload.into_bytes());
    }

    #[test]
    fn third_person_wraps_in_ctcp_action() {
        let msgs = make_privmsgs("#c", "waves", true, None).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].as_bytes(), b"PRIVMSG #c :\x01ACTION waves\x01\r\n");
    }
}
