//! The handler type the dispatch layer calls on every inbound message.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{client::Client, message::ReceivedMessage};

/// An error raised by a handler. Handlers are user-supplied and may fail for any reason — a boxed
/// trait object lets any error type reach the dispatcher via `?` without a dedicated wrapper.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<(), HandlerError>;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// A message handler: an async callback invoked with the client and the message that triggered it.
///
/// Stored as a trait object rather than a generic parameter since a `Client` holds an
/// order-sensitive, heterogeneous list of them.
pub type Handler =
    Arc<dyn for<'a> Fn(&'a mut Client, &'a ReceivedMessage) -> HandlerFuture<'a> + Send + Sync>;
