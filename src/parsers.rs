//! Small, pure parsers the dispatch layer depends on: splitting a user mask, recognising channel
//! names, and decomposing a PRIVMSG.

use crate::{constants, message::ReceivedMessage};

/// The constituent parts of a `nick!ident@host` (or identd-less `~nick@host`) user mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickParts {
    pub nick: String,
    pub ident: Option<String>,
    pub host: String,
}

/// Splits a user mask into its parts. Returns `None` for masks that are missing a host, since
/// unlike inbound message parsing this is applied deliberately to a prefix already known to be a
/// user mask, not to arbitrary network input.
pub fn nick(raw: &str) -> Option<NickParts> {
    match raw.split_once('!') {
        Some((nick, rest)) => {
            let (ident, host) = rest.split_once('@')?;
            Some(NickParts {
                nick: nick.to_string(),
                ident: Some(ident.to_string()),
                host: host.to_string(),
            })
        }
        None => {
            let (nick, host) = raw.split_once('@')?;
            Some(NickParts {
                nick: nick.trim_start_matches('~').to_string(),
                ident: None,
                host: host.to_string(),
            })
        }
    }
}

/// True iff `name` is a channel name: at most 50 bytes, starting with `&`, `#`, `+`, or `!`, and
/// free of spaces, commas, and the ASCII BEL control character.
pub fn is_channel(name: &str) -> bool {
    name.len() <= 50
        && matches!(name.chars().next(), Some('&' | '#' | '+' | '!'))
        && !name.contains([' ', ',', '\x07'])
}

/// The fields of interest when a `PRIVMSG` arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivmsgInfo {
    /// The first parameter: the channel or nick the message was sent to.
    pub target: String,
    /// The message's unparsed prefix.
    pub raw_sender: String,
    /// The sending nick, as recovered by [`nick`] from `raw_sender`.
    pub sender_nick: String,
    /// The message body with any CTCP ACTION framing removed.
    pub raw_body: Vec<u8>,
    /// `target` when it names a channel, otherwise `sender_nick` — the conversation this message
    /// belongs to from the client's point of view.
    pub channel: String,
    /// Whether the body arrived wrapped in CTCP ACTION framing (a `/me`-style message).
    pub third_person: bool,
}

/// Decomposes a parsed `PRIVMSG` into [`PrivmsgInfo`].
pub fn privmsg(message: &ReceivedMessage) -> PrivmsgInfo {
    let target = message.params.first().cloned().unwrap_or_default();
    let raw_sender = message.prefix.clone();
    let sender_nick = nick(&raw_sender)
        .map(|parts| parts.nick)
        .unwrap_or_else(|| raw_sender.clone());
    let channel = if is_channel(&target) {
        target.clone()
    } else {
        sender_nick.clone()
    };
    let (raw_body, third_person) = strip_ctcp_action(&message.suffix);

    PrivmsgInfo {
        target,
        raw_sender,
        sender_nick,
        raw_body,
        channel,
        third_person,
    }
}

fn strip_ctcp_action(body: &[u8]) -> (Vec<u8>, bool) {
    let min_len = constants::ACTION_START.len() + constants::ACTION_END.len();
    if body.len() >= min_len
        && body.starts_with(constants::ACTION_START)
        && body.ends_with(constants::ACTION_END)
    {
        let inner = &body[constants::ACTION_START.len()..body.len() - constants::ACTION_END.len()];
        (inner.to_vec(), true)
    } else {
        (body.to_vec(), false)
    }
}
