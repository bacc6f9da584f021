//! Composable wrappers that restrict a [`Handler`] to a subset of commands.

use std::{collections::HashSet, sync::Arc};

use crate::handler::Handler;

/// Converts a single command or a set of commands into the set a filter matches against.
///
/// Implemented for a bare command string so callers can write `allow("PING", ping_handler)`
/// without wrapping a singleton in a slice.
pub trait IntoCommandSet {
    fn into_command_set(self) -> HashSet<String>;
}

impl IntoCommandSet for &str {
    fn into_command_set(self) -> HashSet<String> {
        HashSet::from([self.to_string()])
    }
}

impl IntoCommandSet for &[&str] {
    fn into_command_set(self) -> HashSet<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoCommandSet for [&str; N] {
    fn into_command_set(self) -> HashSet<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// Wraps `handler` so it only runs when `message.command` is in `commands`.
pub fn allow(commands: impl IntoCommandSet, handler: Handler) -> Handler {
    let commands = commands.into_command_set();
    Arc::new(move |client, message| {
        if commands.contains(&message.command) {
            handler(client, message)
        } else {
            Box::pin(std::future::ready(Ok(()))) as crate::handler::HandlerFuture<'_>
        }
    })
}

/// Wraps `handler` so it only runs when `message.command` is *not* in `commands`.
pub fn deny(commands: impl IntoCommandSet, handler: Handler) -> Handler {
    let commands = commands.into_command_set();
    Arc::new(move |client, message| {
        if commands.contains(&message.command) {
            Box::pin(std::future::ready(Ok(()))) as crate::handler::HandlerFuture<'_>
        } else {
            handler(client, message)
        }
    })
}
