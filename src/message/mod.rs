//! The wire codec: parsing inbound lines, building and chunking outbound ones.

mod chunk;
mod outbound;
mod received;

pub use chunk::{chunk_message, make_privmsgs};
pub use outbound::{build, build_message, BuildError, OutboundMessage};
pub use received::ReceivedMessage;
