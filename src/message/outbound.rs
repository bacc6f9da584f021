use thiserror::Error;

use crate::{constants::MAX_LINE_LENGTH, encoding::IntoIrcBytes};

const LINEFEED: &[u8] = b"\r\n";

/// A validated outbound line: at most 512 bytes, terminated by CR-LF, never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage(Vec<u8>);

impl OutboundMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("message component contains a stray CR or LF")]
    StrayLineEnding,
    #[error("message exceeds the 512-byte line limit")]
    MessageTooLong,
}

/// Builds a message with no prefix: `command param1 param2 … [:suffix]\r\n`.
///
/// An empty `suffix` (`""` or `&[]`) omits the trailing ` :suffix` entirely.
pub fn build_message(
    command: impl IntoIrcBytes,
    params: &[&str],
    suffix: impl IntoIrcBytes,
) -> Result<OutboundMessage, BuildError> {
    build(command, params, "", suffix)
}

/// Builds a message with an explicit prefix: `:prefix command param1 … [:suffix]\r\n`.
///
/// Clients sending to a server essentially never set `prefix` (servers reject self-asserted
/// prefixes), but the codec doesn't enforce that; it's a client-library ergonomics policy, not a
/// wire-format rule.
pub fn build(
    command: impl IntoIrcBytes,
    params: &[&str],
    prefix: impl IntoIrcBytes,
    suffix: impl IntoIrcBytes,
) -> Result<OutboundMessage, BuildError> {
    let command = command.into_irc_bytes();
    let prefix = prefix.into_irc_bytes();
    let params: Vec<Vec<u8>> = params.iter().map(|p| p.into_irc_bytes()).collect();
    let suffix = suffix.into_irc_bytes();

    let contains_line_ending = |b: &[u8]| b.contains(&b'\r') || b.contains(&b'\n');
    if contains_line_ending(&command)
        || contains_line_ending(&prefix)
        || contains_line_ending(&suffix)
        || params.iter().any(|p| contains_line_ending(p))
    {
        return Err(BuildError::StrayLineEnding);
    }

    let mut message = Vec::new();
    if !prefix.is_empty() {
        message.push(b':');
        message.extend_from_slice(&prefix);
        message.push(b' ');
    }
    message.extend_from_slice(&command);
    for param in &params {
        message.push(b' ');
        message.extend_from_slice(param);
    }
    if !suffix.is_empty() {
        message.extend_from_slice(b" :");
        message.extend_from_slice(&suffix);
    }
    message.extend_from_slice(LINEFEED);

    if message.len() > MAX_LINE_LENGTH {
        return Err(BuildError::MessageTooLong);
    }

    Ok(OutboundMessage(message))
}
