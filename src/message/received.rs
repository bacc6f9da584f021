use crate::encoding::to_unicode_default;

/// A message received from the IRC network, split into its wire-format components.
///
/// Parsing never fails: a malformed line simply yields an empty `prefix`/`suffix` and whatever
/// tokens happened to be present, per the protocol's own leniency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Text between a leading `:` and the first space; empty when the line had no prefix.
    pub prefix: String,
    /// An uppercase verb (e.g. `PRIVMSG`) or a three-digit numeric reply code (e.g. `433`).
    pub command: String,
    /// Ordered tokens after the command; never contains empty tokens.
    pub params: Vec<String>,
    /// The trailing parameter, introduced by ` :`, kept as raw bytes since it may carry an
    /// arbitrary network encoding.
    pub suffix: Vec<u8>,
    /// The original line, retained for debugging.
    pub raw: Vec<u8>,
}

impl ReceivedMessage {
    /// Parses one inbound line. `raw` may or may not include a trailing CR-LF.
    pub fn parse(raw: &[u8]) -> Self {
        let original = raw.to_vec();
        let message = trim_trailing_whitespace(raw);

        let (prefix_bytes, message): (&[u8], &[u8]) = if message.first() == Some(&b':') {
            match find(&message[1..], b" ") {
                Some(idx) => (&message[1..1 + idx], &message[1 + idx + 1..]),
                // no space after the prefix: treat the whole remainder as the prefix, leaving
                // nothing for a command. this is malformed input; parsing still must not fail.
                None => {
                    log::trace!("received line with a prefix but no command: {message:?}");
                    (&message[1..], &[][..])
                }
            }
        } else {
            (&[][..], message)
        };

        let (message, suffix): (&[u8], Vec<u8>) = match find(message, b" :") {
            Some(idx) => (&message[..idx], message[idx + 2..].to_vec()),
            None => (message, Vec::new()),
        };

        let mut tokens = message
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty());
        let command = tokens.next().unwrap_or(&[][..]);
        let params: Vec<String> = tokens.map(to_unicode_default).collect();

        ReceivedMessage {
            prefix: to_unicode_default(prefix_bytes),
            command: to_unicode_default(command),
            params,
            suffix,
            raw: original,
        }
    }
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    &bytes[..end]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_prefix_command_params_suffix() {
        let msg = ReceivedMessage::parse(b":nick!user@host PRIVMSG #chan :hello world\r\n");
        assert_eq!(msg.prefix, "nick!user@host");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#chan".to_string()]);
        assert_eq!(msg.suffix, b"hello world".to_vec());
    }

    #[test]
    fn parses_without_prefix() {
        let msg = ReceivedMessage::parse(b"PING :hostname.example.com\r\n");
        assert_eq!(msg.prefix, "");
        assert_eq!(msg.command, "PING");
        assert!(msg.params.is_empty());
        assert_eq!(msg.suffix, b"hostname.example.com".to_vec());
    }

    #[test]
    fn parses_without_suffix() {
        let msg = ReceivedMessage::parse(b":server 433 * taken :Nickname is already in use\r\n");
        assert_eq!(msg.command, "433");
        assert_eq!(msg.params, vec!["*".to_string(), "taken".to_string()]);
        assert_eq!(msg.suffix, b"Nickname is already in use".to_vec());
    }

    #[test]
    fn splits_suffix_on_first_space_colon_only() {
        let msg = ReceivedMessage::parse(b"PRIVMSG #chan :hi : there\r\n");
        assert_eq!(msg.suffix, b"hi : there".to_vec());
    }

    #[test]
    fn malformed_line_never_fails() {
        let msg = ReceivedMessage::parse(b"");
        assert_eq!(msg.prefix, "");
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());

        let msg = ReceivedMessage::parse(b":");
        assert_eq!(msg.command, "");

        let msg = ReceivedMessage::parse(b"   \r\n");
        assert_eq!(msg.command, "");
    }

    #[test]
    fn discards_empty_tokens_from_runs_of_whitespace() {
        let msg = ReceivedMessage::parse(b"JOIN   #a   #b\r\n");
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.params, vec!["#a".to_string(), "#b".to_string()]);
    }

    #[test]
    fn preserves_raw_line() {
        let raw = b"PING :x\r\n";
        let msg = ReceivedMessage::parse(raw);
        assert_eq!(msg.raw, raw.to_vec());
    }
}
