//! Message types exchanged with remote players, plus validation
//! helpers for inbound payloads.
//!
//! Inbound traffic is adversarial: it arrives as raw JSON and is
//! validated field by field, so malformed or hostile payloads surface
//! as typed [`MessageError`]s instead of deserialization panics.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::errors::MessageError;
use crate::game::entities::Card;
use crate::game::scores::Score;

/// Message type expected from a player during the card exchange.
pub const MSG_CHANGE_CARDS: &str = "change-cards";

/// A message from the engine to a single player.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "message_type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// The player's message failed validation. Sent best-effort before
    /// the player is eliminated.
    Error { error: String },
    /// The player's private hand and its current score.
    SetCards { cards: Vec<Card>, score: Score },
}

/// Check the `message_type` discriminator of a raw inbound payload.
pub fn validate_message_type(message: &JsonValue, expected: &str) -> Result<(), MessageError> {
    match message.get("message_type").and_then(JsonValue::as_str) {
        Some(kind) if kind == expected => Ok(()),
        Some(_) | None => Err(MessageError::format(
            "message_type",
            &format!("'{expected}' message expected"),
        )),
    }
}

/// Extract the `cards` attribute as a list of hand indices. Presence
/// and shape are validated here; range checks against the player's
/// actual hand belong to the exchange protocol.
pub fn cards_attribute(message: &JsonValue) -> Result<Vec<usize>, MessageError> {
    let cards = message
        .get("cards")
        .ok_or_else(|| MessageError::format("cards", "Attribute is missing"))?;
    cards
        .as_array()
        .ok_or_else(|| MessageError::format("cards", "Invalid list of cards"))?
        .iter()
        .map(|key| {
            key.as_u64()
                .map(|k| k as usize)
                .ok_or_else(|| MessageError::format("cards", "Invalid list of cards"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === Validation Tests ===

    #[test]
    fn test_validate_message_type_accepts_expected_kind() {
        let message = json!({"message_type": "change-cards", "cards": []});
        assert!(validate_message_type(&message, MSG_CHANGE_CARDS).is_ok());
    }

    #[test]
    fn test_validate_message_type_rejects_wrong_kind() {
        let message = json!({"message_type": "bet", "cards": []});
        let err = validate_message_type(&message, MSG_CHANGE_CARDS).unwrap_err();
        assert_eq!(err.to_string(), "message_type: 'change-cards' message expected");
    }

    #[test]
    fn test_validate_message_type_rejects_missing_kind() {
        let message = json!({"cards": []});
        assert!(validate_message_type(&message, MSG_CHANGE_CARDS).is_err());
    }

    #[test]
    fn test_cards_attribute_missing() {
        let message = json!({"message_type": "change-cards"});
        let err = cards_attribute(&message).unwrap_err();
        assert_eq!(err.to_string(), "cards: Attribute is missing");
    }

    #[test]
    fn test_cards_attribute_not_a_list() {
        let message = json!({"message_type": "change-cards", "cards": "zero"});
        let err = cards_attribute(&message).unwrap_err();
        assert_eq!(err.to_string(), "cards: Invalid list of cards");
    }

    #[test]
    fn test_cards_attribute_non_integer_entry() {
        let message = json!({"message_type": "change-cards", "cards": [0, "one"]});
        assert!(cards_attribute(&message).is_err());
    }

    #[test]
    fn test_cards_attribute_returns_indices() {
        let message = json!({"message_type": "change-cards", "cards": [0, 2, 4]});
        assert_eq!(cards_attribute(&message).unwrap(), vec![0, 2, 4]);
    }

    // === ServerMessage Tests ===

    #[test]
    fn test_error_notice_wire_shape() {
        let notice = ServerMessage::Error {
            error: "cards: Invalid list of cards".to_string(),
        };
        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(value["message_type"], "error");
        assert_eq!(value["error"], "cards: Invalid list of cards");
    }
}
