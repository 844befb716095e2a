//! Player-facing messaging: channel endpoints, wire message types, and
//! the protocol error taxonomy.

pub mod channel;
pub mod errors;
pub mod messages;

pub use channel::{PlayerChannel, RemoteEnd};
pub use errors::{ChannelError, MessageError};
pub use messages::ServerMessage;
