//! An asynchronous IRC (RFC 1459 / RFC 2812) client framework.
//!
//! The three pieces that carry the real weight are [`message`] (the line-protocol codec),
//! [`connection`] (the socket lifecycle and read loop), and [`handler`]/[`filters`] (dispatch).
//! [`Client`] ties identity (nick, real name) to a connection and exposes the ergonomic methods
//! (`join`, `part`, `privmsg`, `set_nick`) that handlers and callers use to talk back to the
//! network.

pub mod client;
pub mod connection;
pub mod constants;
pub mod encoding;
pub mod filters;
pub mod handler;
pub mod handlers;
pub mod message;
pub mod parsers;

pub use client::{Client, ClientBuilder, ClientBuilderError, ClientError};
pub use connection::{Connection, SendError, SendPayload};
pub use handler::{Handler, HandlerError, HandlerFuture, HandlerResult};
pub use message::{
    build_message, chunk_message, make_privmsgs, BuildError, OutboundMessage, ReceivedMessage,
};
