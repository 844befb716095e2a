//! Lifecycle events and their dispatch seam.
//!
//! Every milestone of a hand maps to exactly one variant of
//! [`GameEvent`], with a fixed field list, so observers rendering live
//! state from the event stream never see an ad hoc payload. Events are
//! raised strictly after the state change they describe.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::entities::{Bets, Card, PlayerId, PlayerView, Usd};
use super::pots::{Payout, PotView, Pots};
use super::scores::Score;

/// Textual format of absolute deadlines shown to observers, e.g.
/// `2026-08-25 14:03:07+0000`.
const TIMEOUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S+0000";

#[must_use]
pub fn format_timeout_date(deadline: DateTime<Utc>) -> String {
    deadline.format(TIMEOUT_DATE_FORMAT).to_string()
}

/// Kinds of pending player actions announced via `player-action`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerActionKind {
    ChangeCards,
    Bet,
}

/// A revealed hand at showdown.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ShowdownEntry {
    pub player: PlayerView,
    pub cards: Vec<Card>,
    pub score: Score,
}

/// The closed set of outbound lifecycle events.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "message_type", rename_all = "kebab-case")]
pub enum GameEvent {
    /// A hand has started: seating order, dealer, and the blinds
    /// already collected from every active player.
    NewGame {
        game_id: Uuid,
        game_type: String,
        player_ids: Vec<PlayerId>,
        dealer_id: PlayerId,
        blind_bets: Bets,
    },
    /// Terminal marker for the hand. Empty payload.
    GameOver,
    /// A player has been asked to act; observers can render a
    /// countdown from the timeout and its absolute deadline.
    PlayerAction {
        action: PlayerActionKind,
        player: PlayerView,
        timeout: u64,
        timeout_date: String,
    },
    /// A player exchanged cards (possibly zero).
    ChangeCards { player: PlayerView, num_cards: usize },
    /// A player left the hand: busted blinds, fold elimination, or a
    /// protocol failure.
    DeadPlayer { player: PlayerView },
    /// Pot layering changed.
    PotsUpdate {
        players: Vec<PlayerView>,
        pots: Vec<PotView>,
    },
    /// Remaining hands revealed for comparison.
    Showdown { players: Vec<ShowdownEntry> },
    /// One pot resolved to its winners.
    WinnerDesignation {
        pot: PotView,
        winner_ids: Vec<PlayerId>,
        money_split: Usd,
        players: Vec<PlayerView>,
    },
}

/// Capability seam between the hand engine and whatever delivers
/// events to observers. One method per event kind; the defaults shape
/// the fixed payloads, so a variant dispatcher overrides only what it
/// changes (e.g. the advertised game type) and the delivery sink
/// implements [`raise_event`](Self::raise_event).
pub trait GameEventDispatcher: Send {
    /// Deliver one shaped event. Implementations must preserve order.
    fn raise_event(&mut self, event: GameEvent);

    /// Game type stamped into `new-game` events.
    fn game_type(&self) -> &'static str {
        "traditional"
    }

    fn new_game_event(
        &mut self,
        game_id: Uuid,
        players: &[PlayerView],
        dealer_id: &PlayerId,
        blind_bets: &Bets,
    ) {
        self.raise_event(GameEvent::NewGame {
            game_id,
            game_type: self.game_type().to_string(),
            player_ids: players.iter().map(|p| p.id.clone()).collect(),
            dealer_id: dealer_id.clone(),
            blind_bets: blind_bets.clone(),
        });
    }

    fn game_over_event(&mut self) {
        self.raise_event(GameEvent::GameOver);
    }

    fn change_cards_action_event(
        &mut self,
        player: PlayerView,
        timeout: Duration,
        timeout_date: DateTime<Utc>,
    ) {
        self.raise_event(GameEvent::PlayerAction {
            action: PlayerActionKind::ChangeCards,
            player,
            timeout: timeout.as_secs(),
            timeout_date: format_timeout_date(timeout_date),
        });
    }

    fn change_cards_event(&mut self, player: PlayerView, num_cards: usize) {
        self.raise_event(GameEvent::ChangeCards { player, num_cards });
    }

    fn dead_player_event(&mut self, player: PlayerView) {
        self.raise_event(GameEvent::DeadPlayer { player });
    }

    fn pots_update_event(&mut self, players: Vec<PlayerView>, pots: &Pots) {
        self.raise_event(GameEvent::PotsUpdate {
            players,
            pots: pots.side_pots(),
        });
    }

    fn showdown_event(&mut self, players: Vec<ShowdownEntry>) {
        self.raise_event(GameEvent::Showdown { players });
    }

    fn winner_designation_event(&mut self, payout: &Payout, players: Vec<PlayerView>) {
        self.raise_event(GameEvent::WinnerDesignation {
            pot: payout.pot.clone(),
            winner_ids: payout.winner_ids.clone(),
            money_split: payout.money_split,
            players,
        });
    }
}

/// Dispatcher that forwards shaped events into a tokio channel; the
/// other end is the event bus (or a test harness).
#[derive(Debug)]
pub struct ChannelEventDispatcher {
    sender: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelEventDispatcher {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl GameEventDispatcher for ChannelEventDispatcher {
    fn raise_event(&mut self, event: GameEvent) {
        if self.sender.send(event).is_err() {
            warn!("event sink closed, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timeout_date_format() {
        let deadline = Utc.with_ymd_and_hms(2026, 8, 25, 14, 3, 7).unwrap();
        assert_eq!(format_timeout_date(deadline), "2026-08-25 14:03:07+0000");
    }

    #[test]
    fn test_new_game_event_wire_shape() {
        let (mut dispatcher, mut events) = ChannelEventDispatcher::new();
        let alice = PlayerView {
            id: PlayerId::new("alice"),
            name: "alice".to_string(),
            money: 90,
        };
        let mut blind_bets = Bets::new();
        blind_bets.insert(PlayerId::new("alice"), 10);

        dispatcher.new_game_event(
            Uuid::nil(),
            std::slice::from_ref(&alice),
            &PlayerId::new("alice"),
            &blind_bets,
        );

        let event = events.try_recv().unwrap();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["message_type"], "new-game");
        assert_eq!(value["game_type"], "traditional");
        assert_eq!(value["player_ids"][0], "alice");
        assert_eq!(value["dealer_id"], "alice");
        assert_eq!(value["blind_bets"]["alice"], 10);
    }

    #[test]
    fn test_player_action_event_wire_shape() {
        let (mut dispatcher, mut events) = ChannelEventDispatcher::new();
        let player = PlayerView {
            id: PlayerId::new("bob"),
            name: "bob".to_string(),
            money: 50,
        };
        let deadline = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        dispatcher.change_cards_action_event(player, Duration::from_secs(30), deadline);

        let value = serde_json::to_value(events.try_recv().unwrap()).unwrap();
        assert_eq!(value["message_type"], "player-action");
        assert_eq!(value["action"], "change-cards");
        assert_eq!(value["timeout"], 30);
        assert_eq!(value["timeout_date"], "2026-01-02 03:04:05+0000");
    }

    #[test]
    fn test_game_over_event_has_empty_payload() {
        let (mut dispatcher, mut events) = ChannelEventDispatcher::new();
        dispatcher.game_over_event();
        let value = serde_json::to_value(events.try_recv().unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"message_type": "game-over"}));
    }
}
