use std::sync::Arc;

use crate::{constants, filters, handler::Handler, parsers};

/// Learns how many bytes the server's prefix mask adds to our own outbound messages, by watching
/// for a `PRIVMSG`/`NOTICE` we sent ourselves or a self-`WHOIS` reply. Once learned, it is skipped
/// until the next nick change resets it.
pub fn capture_mask_length() -> Handler {
    let handler: Handler = Arc::new(|client, message| {
        Box::pin(async move {
            if client.mask_length().is_some() {
                return Ok(());
            }

            if message.command == constants::PRIVMSG || message.command == constants::NOTICE {
                if let Some(parts) = parsers::nick(&message.prefix) {
                    if parts.nick == client.nick() {
                        client.set_mask_length(message.prefix.len());
                        log::debug!("learned mask length {} from our own message", message.prefix.len());
                    }
                }
            } else if let Some(target_nick) = message.params.first() {
                // RPL_WHOISUSER: the real name already lives in `suffix`, so the mask length is
                // the length of every param but the trailing one (the host-mask flag), joined
                // back with single spaces.
                if target_nick == client.nick() {
                    let without_real_name = &message.params[..message.params.len() - 1];
                    let len = without_real_name.join(" ").len();
                    client.set_mask_length(len);
                    log::debug!("learned mask length {len} from a self-WHOIS reply");
                }
            }

            Ok(())
        }) as crate::handler::HandlerFuture<'_>
    });
    filters::allow(
        [constants::PRIVMSG, constants::NOTICE, constants::RPL_WHOISUSER],
        handler,
    )
}
