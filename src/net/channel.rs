//! The engine-side endpoint of a player's message channel.
//!
//! The transport that carries messages to and from the actual client
//! (websocket, iroh, in-process bot) is out of scope; everything is a
//! pair of tokio mpsc channels. The engine owns one [`PlayerChannel`]
//! per seated player, the transport holds the matching [`RemoteEnd`].

use serde_json::Value as JsonValue;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

use super::errors::{ChannelError, MessageError};
use super::messages::ServerMessage;

/// How many unread inbound messages a player may queue before their
/// transport gets backpressure.
const INBOUND_CAPACITY: usize = 64;

/// The engine's endpoint for one player.
#[derive(Debug)]
pub struct PlayerChannel {
    outgoing: mpsc::UnboundedSender<JsonValue>,
    incoming: mpsc::Receiver<JsonValue>,
}

/// The transport's endpoint for one player.
#[derive(Debug)]
pub struct RemoteEnd {
    /// Messages from the engine to the player.
    pub incoming: mpsc::UnboundedReceiver<JsonValue>,
    /// Messages from the player to the engine.
    pub outgoing: mpsc::Sender<JsonValue>,
}

impl RemoteEnd {
    /// Push a raw payload to the engine, as a remote client would.
    pub fn send_raw(&self, message: JsonValue) -> Result<(), ChannelError> {
        self.outgoing
            .try_send(message)
            .map_err(|_| ChannelError::SendFailed)
    }
}

impl PlayerChannel {
    /// Create a connected channel pair.
    #[must_use]
    pub fn pair() -> (Self, RemoteEnd) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::channel(INBOUND_CAPACITY);
        (
            Self {
                outgoing: out_tx,
                incoming: in_rx,
            },
            RemoteEnd {
                incoming: out_rx,
                outgoing: in_tx,
            },
        )
    }

    /// Send a message to the player. Fails if the transport side is
    /// gone or the message cannot be serialized.
    pub fn send_message(&self, message: &ServerMessage) -> Result<(), ChannelError> {
        let payload = serde_json::to_value(message).map_err(|_| ChannelError::SendFailed)?;
        self.outgoing
            .send(payload)
            .map_err(|_| ChannelError::SendFailed)
    }

    /// Wait for the player's next message up to `deadline`. Expiry is
    /// not retried: it surfaces as [`MessageError::Timeout`] and the
    /// caller decides the player's fate.
    pub async fn recv_message(&mut self, deadline: Instant) -> Result<JsonValue, MessageError> {
        match timeout_at(deadline, self.incoming.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(ChannelError::Closed.into()),
            Err(_) => Err(MessageError::Timeout),
        }
    }
}
