//! Error types for the player-facing message protocol.

use thiserror::Error;

/// The player's channel is unusable. Always terminal for that player:
/// the engine eliminates them rather than retrying.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ChannelError {
    #[error("player channel closed")]
    Closed,
    #[error("player channel send failed")]
    SendFailed,
}

/// Why a player's turn failed. Every variant is handled the same way
/// by the engine (error notice, then elimination), but the taxonomy is
/// kept so notices and logs can say what actually went wrong.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MessageError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("{attribute}: {description}")]
    Format {
        attribute: String,
        description: String,
    },
    #[error("timed out waiting for player response")]
    Timeout,
}

impl MessageError {
    #[must_use]
    pub fn format(attribute: &str, description: &str) -> Self {
        Self::Format {
            attribute: attribute.to_string(),
            description: description.to_string(),
        }
    }
}
