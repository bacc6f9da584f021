//! Binds user identity to a connection and fans inbound messages out to handlers.

use std::mem;

use thiserror::Error;

use crate::{
    connection::{ConnectError, Connection, SendError, SendPayload},
    constants,
    handler::Handler,
    message::{build_message, make_privmsgs, BuildError, OutboundMessage, ReceivedMessage},
};

/// `nick` and `real_name` are ordinary constructor parameters, so the type system already rules
/// out building a `Client` without them. The one field that still needs runtime validation is the
/// host passed to [`Client::connect_to`], which keeps this error type alive for that case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientBuilderError {
    #[error("missing required field: {0}")]
    MissingRequired(&'static str),
}

/// Builds a [`Client`], naming every required field explicitly in place of the dynamic
/// presence-checking mixin a more loosely typed client library would reach for.
pub struct ClientBuilder {
    nick: String,
    real_name: String,
    handlers: Vec<Handler>,
}

impl ClientBuilder {
    pub fn new(nick: impl Into<String>, real_name: impl Into<String>) -> Self {
        ClientBuilder {
            nick: nick.into(),
            real_name: real_name.into(),
            handlers: Vec::new(),
        }
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn build(self) -> Client {
        Client {
            nick: self.nick,
            real_name: self.real_name,
            handlers: self.handlers,
            connection: None,
            mask_length: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Connect(#[from] ConnectError),
}

/// Combines the two ways building and sending a command can fail, so `join`/`part`/`set_nick`/
/// `privmsg` can use `?` against either without a manual `match`.
#[derive(Debug, Error)]
pub enum ClientSendError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Send(#[from] SendError),
}

/// An IRC client: identity (`nick`, `real_name`), a handler list, and at most one connection.
///
/// Holds its connection directly with no back-reference from the connection to the client — the
/// client drives its own read loop with `&mut self` access to both, so there is no cycle to model.
pub struct Client {
    nick: String,
    real_name: String,
    handlers: Vec<Handler>,
    connection: Option<Connection>,
    mask_length: Option<usize>,
}

impl Client {
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn mask_length(&self) -> Option<usize> {
        self.mask_length
    }

    pub(crate) fn set_mask_length(&mut self, len: usize) {
        self.mask_length = Some(len);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(Connection::is_connected)
    }

    /// Opens a connection to `host` and drives it to completion on the async runtime, returning a
    /// handle to that task. `port` defaults to 6697 and `tls` defaults to enabled.
    pub fn connect_to(
        mut self,
        host: impl Into<String>,
        port: Option<u16>,
        tls: Option<bool>,
    ) -> Result<tokio::task::JoinHandle<Result<(), ClientError>>, ClientBuilderError> {
        let host = host.into();
        if host.is_empty() {
            return Err(ClientBuilderError::MissingRequired("host"));
        }
        self.connection = Some(Connection::new(host, port.unwrap_or(6697), tls.unwrap_or(true)));
        Ok(tokio::spawn(self.run()))
    }

    async fn run(mut self) -> Result<(), ClientError> {
        self.connection
            .as_mut()
            .expect("connect_to sets the connection before spawning")
            .open()
            .await?;
        self.on_connect().await;

        loop {
            let line = {
                let connection = self
                    .connection
                    .as_mut()
                    .expect("connection is set for the lifetime of the read loop");
                match connection.read_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("read error, disconnecting: {e}");
                        break;
                    }
                }
            };

            let message = ReceivedMessage::parse(&line);
            self.on_message(&message).await;
        }

        if let Some(connection) = self.connection.as_mut() {
            connection.disconnect();
        }
        Ok(())
    }

    async fn on_connect(&mut self) {
        let real_name = self.real_name.clone();
        match build_message(constants::USER, &[self.nick.as_str(), "0", "*"], real_name.as_str()) {
            Ok(msg) => {
                if let Err(e) = self.send(SendPayload::from(msg)).await {
                    log::error!("failed to send USER during registration: {e}");
                }
            }
            Err(e) => log::error!("failed to build USER command: {e}"),
        }

        let nick = self.nick.clone();
        if let Err(e) = self.set_nick(nick).await {
            log::error!("failed to send initial NICK: {e}");
        }
    }

    /// Invokes every registered handler in registration order. A handler error is logged and does
    /// not prevent sibling handlers from running or abort the read loop.
    async fn on_message(&mut self, message: &ReceivedMessage) {
        // `mem::take` frees `self.handlers` for the duration of the loop so each handler call can
        // still take `&mut self`, then the list is put back once dispatch finishes.
        let handlers = mem::take(&mut self.handlers);
        for handler in &handlers {
            if let Err(e) = handler(self, message).await {
                log::error!("handler error while processing {}: {e}", message.command);
            }
        }
        self.handlers = handlers;
    }

    pub(crate) async fn send(&mut self, payload: SendPayload) -> Result<(), SendError> {
        self.connection
            .as_mut()
            .ok_or(SendError::NotConnected)?
            .send(payload)
            .await
    }

    async fn send_batch(
        &mut self,
        messages: impl IntoIterator<Item = OutboundMessage>,
    ) -> Result<(), SendError> {
        self.connection
            .as_mut()
            .ok_or(SendError::NotConnected)?
            .send_batch(messages)
            .await
    }

    /// Sends `NICK new_nick`; on success, updates `self.nick` and clears the discovered mask
    /// length, since a new nick implies a new (unknown) mask.
    pub async fn set_nick(&mut self, new_nick: impl Into<String>) -> Result<(), ClientSendError> {
        let new_nick = new_nick.into();
        let msg = build_message(constants::NICK, &[new_nick.as_str()], "")?;
        self.send(SendPayload::from(msg)).await?;
        self.nick = new_nick;
        self.mask_length = None;
        Ok(())
    }

    pub async fn join(&mut self, channels: &[&str]) -> Result<(), ClientSendError> {
        let target = channels.join(",");
        let msg = build_message(constants::JOIN, &[target.as_str()], "")?;
        self.send(SendPayload::from(msg)).await?;
        Ok(())
    }

    pub async fn part(&mut self, channels: &[&str], message: &str) -> Result<(), ClientSendError> {
        let target = channels.join(",");
        let msg = build_message(constants::PART, &[target.as_str()], message)?;
        self.send(SendPayload::from(msg)).await?;
        Ok(())
    }

    pub async fn privmsg(
        &mut self,
        target: &str,
        message: &str,
        third_person: bool,
    ) -> Result<(), ClientSendError> {
        let messages = make_privmsgs(target, message, third_person, self.mask_length)?;
        self.send_batch(messages).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[test]
    fn builder_carries_nick_and_real_name() {
        let client = ClientBuilder::new("nick", "Real Name").build();
        assert_eq!(client.nick(), "nick");
        assert_eq!(client.real_name(), "Real Name");
        assert_eq!(client.mask_length(), None);
        assert!(!client.is_connected());
    }

    #[test]
    fn connect_to_rejects_an_empty_host() {
        let client = ClientBuilder::new("nick", "Real Name").build();
        let err = client.connect_to("", None, None).unwrap_err();
        assert_eq!(err, ClientBuilderError::MissingRequired("host"));
    }

    #[tokio::test]
    async fn dispatch_calls_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first: Handler = {
            let seen = seen.clone();
            Arc::new(move |_c: &mut Client, _m: &ReceivedMessage| {
                let seen = seen.clone();
                Box::pin(async move {
                    seen.lock().unwrap().push("first");
                    Ok(())
                }) as crate::handler::HandlerFuture<'_>
            })
        };
        let second: Handler = {
            let seen = seen.clone();
            Arc::new(move |_c: &mut Client, _m: &ReceivedMessage| {
                let seen = seen.clone();
                Box::pin(async move {
                    seen.lock().unwrap().push("second");
                    Ok(())
                }) as crate::handler::HandlerFuture<'_>
            })
        };

        let mut client = ClientBuilder::new("nick", "Real Name")
            .handler(first)
            .handler(second)
            .build();

        let message = ReceivedMessage::parse(b"PING :x\r\n");
        client.on_message(&message).await;

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn a_handler_error_does_not_prevent_later_handlers_from_running() {
        let ran = Arc::new(AtomicUsize::new(0));
        let failing: Handler = Arc::new(|_c, _m| {
            Box::pin(async move {
                Err(Box::<dyn std::error::Error + Send + Sync>::from("boom"))
            }) as crate::handler::HandlerFuture<'_>
        });
        let counting: Handler = {
            let ran = ran.clone();
            Arc::new(move |_c, _m| {
                let ran = ran.clone();
                Box::pin(async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }) as crate::handler::HandlerFuture<'_>
            })
        };

        let mut client = ClientBuilder::new("nick", "Real Name")
            .handler(failing)
            .handler(counting)
            .build();

        let message = ReceivedMessage::parse(b"PING :x\r\n");
        client.on_message(&message).await;

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
