use std::sync::Arc;

use crate::{constants, filters, handler::Handler};

/// On `ERR_NICKNAMEINUSE`, appends a caret to the current nick and retries.
pub fn nickname_in_use() -> Handler {
    let handler: Handler = Arc::new(|client, _message| {
        Box::pin(async move {
            let retry = format!("{}^", client.nick());
            log::debug!("nick {} in use, retrying as {retry}", client.nick());
            client.set_nick(retry).await?;
            Ok(())
        }) as crate::handler::HandlerFuture<'_>
    });
    filters::allow(constants::ERR_NICKNAMEINUSE, handler)
}
