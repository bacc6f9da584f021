use std::sync::Arc;

use crate::{
    connection::SendPayload, constants, filters, handler::Handler, message::build_message,
};

/// Responds to `PING` with `PONG :<suffix>`.
pub fn ping() -> Handler {
    let handler: Handler = Arc::new(|client, message| {
        Box::pin(async move {
            let pong = build_message(constants::PONG, &[], message.suffix.as_slice())?;
            client.send(SendPayload::from(pong)).await?;
            Ok(())
        }) as crate::handler::HandlerFuture<'_>
    });
    filters::allow(constants::PING, handler)
}
