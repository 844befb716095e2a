//! The card-exchange protocol.
//!
//! Each active player, in dealer-relative order, may discard up to
//! four cards and draw replacements, under a hard per-player deadline.
//! Turns are strictly sequential: the deck and the players' hands are
//! shared mutable state scoped to the hand, so there is nothing to
//! parallelize. A misbehaving or unresponsive player is excised from
//! the hand without corrupting it for everyone else.

use chrono::Utc;
use log::{debug, warn};
use std::collections::BTreeSet;
use tokio::time::Instant;

use super::constants::{CHANGE_CARDS_TIMEOUT, MAX_DISCARDS, TIMEOUT_TOLERANCE};
use super::engine::TraditionalGame;
use super::entities::{Card, Deck, PlayerId};
use super::scores::Scores;
use crate::net::errors::MessageError;
use crate::net::messages::{self, MSG_CHANGE_CARDS, ServerMessage};

impl TraditionalGame {
    /// Run the exchange for every active player in rotation order.
    /// Per-player failures are fully contained here: the player is
    /// eliminated and the loop moves on.
    pub(super) async fn change_cards_round(
        &mut self,
        dealer_id: &PlayerId,
        deck: &mut Deck,
        scores: &mut Scores,
    ) {
        for player_id in self.players.round(dealer_id) {
            // Earlier turns in this same rotation may have eliminated
            // the player already.
            if !self.players.is_active(&player_id) {
                continue;
            }
            let Some(view) = self.view_of(&player_id) else {
                continue;
            };

            let deadline = Instant::now() + CHANGE_CARDS_TIMEOUT;
            // The advertised deadline excludes the tolerance; only the
            // enforced receive deadline gets the slack.
            let advertised =
                Utc::now() + chrono::Duration::seconds(CHANGE_CARDS_TIMEOUT.as_secs() as i64);
            self.dispatcher
                .change_cards_action_event(view.clone(), CHANGE_CARDS_TIMEOUT, advertised);

            match self
                .player_discard(&player_id, scores, deadline + TIMEOUT_TOLERANCE)
                .await
            {
                Ok(discard) => {
                    let num_cards = discard.len();
                    if num_cards > 0 {
                        // Compute the replacement hand before touching
                        // any state, so the swap is atomic per player.
                        let new_cards = deck.pop_cards(num_cards);
                        let cards: Vec<Card> = scores
                            .player_cards(&player_id)
                            .iter()
                            .copied()
                            .filter(|card| !discard.contains(card))
                            .chain(new_cards)
                            .collect();
                        deck.push_cards(discard);
                        scores.assign_cards(player_id.clone(), cards);
                        self.send_player_score(&player_id, scores);
                    }
                    debug!("game {}: {player_id} changed {num_cards} cards", self.id);
                    self.dispatcher.change_cards_event(view, num_cards);
                }
                Err(err) => {
                    warn!("game {}: removing {player_id}: {err}", self.id);
                    // Best-effort notice to the player themselves,
                    // before anyone else hears of the elimination.
                    if let Some(player) = self.players.get(&player_id) {
                        let _ = player.channel.send_message(&ServerMessage::Error {
                            error: err.to_string(),
                        });
                    }
                    self.players.deactivate(&player_id);
                    self.dispatcher.dead_player_event(view);
                }
            }
        }
    }

    /// Wait for the player's discard request and resolve it against
    /// their current hand. Nothing is mutated here; on success the
    /// caller applies the swap.
    async fn player_discard(
        &mut self,
        player_id: &PlayerId,
        scores: &Scores,
        deadline: Instant,
    ) -> Result<Vec<Card>, MessageError> {
        let Some(player) = self.players.get_mut(player_id) else {
            return Err(MessageError::format("player", "Unknown player"));
        };
        let message = player.channel.recv_message(deadline).await?;

        messages::validate_message_type(&message, MSG_CHANGE_CARDS)?;
        // Duplicate references collapse to a set before the limit
        // check.
        let keys: BTreeSet<usize> = messages::cards_attribute(&message)?.into_iter().collect();
        if keys.len() > MAX_DISCARDS {
            return Err(MessageError::format(
                "cards",
                "Maximum number of cards exceeded",
            ));
        }

        let hand = scores.player_cards(player_id);
        keys.into_iter()
            .map(|key| {
                hand.get(key)
                    .copied()
                    .ok_or_else(|| MessageError::format("cards", "Invalid list of cards"))
            })
            .collect()
    }
}
