//! End-to-end hand scenarios: blinds, dealing, card exchange with
//! misbehaving players, showdown, and payout, all driven through the
//! public engine API over real channels.

use draw_poker::{
    ChannelEventDispatcher, GameError, GameEvent, GamePlayers, GameSettings, Pacing,
    PassiveBetHandler, Player, PlayerId, TraditionalGame, Usd,
    net::{PlayerChannel, RemoteEnd},
};
use serde_json::json;
use tokio::sync::mpsc;

struct Table {
    game: TraditionalGame,
    remotes: Vec<(PlayerId, RemoteEnd)>,
    events: mpsc::UnboundedReceiver<GameEvent>,
}

impl Table {
    fn new(stacks: &[(&str, Usd)], settings: GameSettings) -> Self {
        let mut remotes = Vec::new();
        let players = GamePlayers::new(
            stacks
                .iter()
                .map(|(name, money)| {
                    let (channel, remote) = PlayerChannel::pair();
                    remotes.push((PlayerId::new(name), remote));
                    Player::new(PlayerId::new(name), name, *money, channel)
                })
                .collect(),
        );
        let (dispatcher, events) = ChannelEventDispatcher::new();
        let game = TraditionalGame::new(
            players,
            Box::new(dispatcher),
            Box::new(PassiveBetHandler),
            settings,
        );
        Self {
            game,
            remotes,
            events,
        }
    }

    fn quiet(stacks: &[(&str, Usd)]) -> Self {
        Self::new(
            stacks,
            GameSettings {
                blind: 10,
                pacing: Pacing::zero(),
            },
        )
    }

    fn respond(&self, player: &str, cards: &[usize]) {
        let (_, remote) = self
            .remotes
            .iter()
            .find(|(id, _)| id == &PlayerId::new(player))
            .unwrap();
        remote
            .send_raw(json!({"message_type": "change-cards", "cards": cards}))
            .unwrap();
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    fn money(&self, player: &str) -> Usd {
        self.game
            .players()
            .get(&PlayerId::new(player))
            .unwrap()
            .money
    }

    fn private_messages(&mut self, player: &str) -> Vec<serde_json::Value> {
        let (_, remote) = self
            .remotes
            .iter_mut()
            .find(|(id, _)| id == &PlayerId::new(player))
            .unwrap();
        let mut drained = Vec::new();
        while let Ok(message) = remote.incoming.try_recv() {
            drained.push(message);
        }
        drained
    }
}

fn event_positions(events: &[GameEvent]) -> (Option<usize>, Option<usize>) {
    let winner = events
        .iter()
        .position(|e| matches!(e, GameEvent::WinnerDesignation { .. }));
    let over = events.iter().position(|e| matches!(e, GameEvent::GameOver));
    (winner, over)
}

#[tokio::test(start_paused = true)]
async fn test_four_players_one_times_out_during_exchange() {
    let mut t = Table::new(
        &[("a", 100), ("b", 100), ("c", 100), ("d", 100)],
        GameSettings::default(),
    );
    // Everyone answers the exchange except c, who goes silent.
    for name in ["a", "b", "d"] {
        t.respond(name, &[]);
    }

    t.game.play_hand(&PlayerId::new("a")).await.unwrap();

    // c was excised; the hand went on with three players.
    assert!(!t.game.players().is_active(&PlayerId::new("c")));
    assert_eq!(t.game.players().count_active(), 3);
    assert_eq!(t.money("c"), 90);

    // Blinds: 40 total wagered, all of it paid back out.
    let total: Usd = ["a", "b", "c", "d"].iter().map(|n| t.money(n)).sum();
    assert_eq!(total, 400);

    let events = t.drain_events();

    // Showdown compared the three remaining hands.
    let showdown = events
        .iter()
        .find_map(|e| match e {
            GameEvent::Showdown { players } => Some(players.len()),
            _ => None,
        })
        .unwrap();
    assert_eq!(showdown, 3);

    // Exactly one game-over, after payout.
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver))
        .count();
    assert_eq!(game_overs, 1);
    let (winner, over) = event_positions(&events);
    assert!(winner.unwrap() < over.unwrap());
    assert_eq!(over.unwrap(), events.len() - 1);

    // c heard about the timeout before anyone else heard about c.
    let notices = t.private_messages("c");
    assert!(
        notices
            .iter()
            .any(|m| m["message_type"] == "error"
                && m["error"] == "timed out waiting for player response")
    );
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::DeadPlayer { player } if player.id == PlayerId::new("c")))
    );
}

#[tokio::test]
async fn test_two_players_discard_and_redraw() {
    let mut t = Table::quiet(&[("a", 100), ("b", 100)]);
    t.respond("a", &[0, 2]);
    t.respond("b", &[]);

    t.game.play_hand(&PlayerId::new("a")).await.unwrap();

    let events = t.drain_events();
    let counts: Vec<(PlayerId, usize)> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ChangeCards { player, num_cards } => {
                Some((player.id.clone(), *num_cards))
            }
            _ => None,
        })
        .collect();
    // Rotation starts after the dealer: b acts first.
    assert_eq!(
        counts,
        vec![(PlayerId::new("b"), 0), (PlayerId::new("a"), 2)]
    );

    // a's hand was pushed privately twice (deal, then post-exchange),
    // five cards both times.
    let set_cards: Vec<serde_json::Value> = t
        .private_messages("a")
        .into_iter()
        .filter(|m| m["message_type"] == "set-cards")
        .collect();
    assert_eq!(set_cards.len(), 2);
    for message in &set_cards {
        assert_eq!(message["cards"].as_array().unwrap().len(), 5);
    }

    // Full pot of 20 paid back out.
    assert_eq!(t.money("a") + t.money("b"), 200);
}

#[tokio::test]
async fn test_blind_elimination_before_betting() {
    let mut t = Table::quiet(&[("a", 100), ("poor", 5), ("b", 100)]);
    t.respond("a", &[]);
    t.respond("b", &[]);

    t.game.play_hand(&PlayerId::new("a")).await.unwrap();

    // The broke player never wagered and never received cards.
    assert!(!t.game.players().is_active(&PlayerId::new("poor")));
    assert_eq!(t.money("poor"), 5);
    assert!(t.private_messages("poor").is_empty());

    let events = t.drain_events();
    let dead = events
        .iter()
        .position(|e| matches!(e, GameEvent::DeadPlayer { player } if player.id == PlayerId::new("poor")))
        .unwrap();
    let new_game = events
        .iter()
        .position(|e| matches!(e, GameEvent::NewGame { .. }))
        .unwrap();
    assert!(dead < new_game, "elimination precedes the new-game event");

    // The eliminated player is absent from the announced seating.
    match &events[new_game] {
        GameEvent::NewGame {
            player_ids,
            blind_bets,
            ..
        } => {
            assert_eq!(player_ids.len(), 2);
            assert!(!player_ids.contains(&PlayerId::new("poor")));
            assert!(blind_bets.values().all(|&amount| amount == 10));
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_hand_aborts_fatally_below_two_funded_players() {
    let mut t = Table::quiet(&[("a", 100), ("x", 5), ("y", 3)]);
    let err = t.game.play_hand(&PlayerId::new("a")).await.unwrap_err();
    assert_eq!(err, GameError::NotEnoughPlayers);

    // The hand never concluded: no game-over, no payout.
    let events = t.drain_events();
    assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver)));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::WinnerDesignation { .. }))
    );
}

#[tokio::test]
async fn test_zero_discards_still_emit_change_cards_events() {
    let mut t = Table::quiet(&[("a", 100), ("b", 100)]);
    t.respond("a", &[]);
    t.respond("b", &[]);

    t.game.play_hand(&PlayerId::new("b")).await.unwrap();

    let events = t.drain_events();
    let counts: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ChangeCards { num_cards, .. } => Some(*num_cards),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![0, 0]);

    // No redraw: each player saw exactly one private hand push.
    for name in ["a", "b"] {
        let pushes = t
            .private_messages(name)
            .into_iter()
            .filter(|m| m["message_type"] == "set-cards")
            .count();
        assert_eq!(pushes, 1);
    }
}

#[tokio::test]
async fn test_malformed_reference_gets_notice_before_elimination_event() {
    let mut t = Table::quiet(&[("a", 100), ("b", 100), ("c", 100)]);
    t.respond("a", &[]);
    t.respond("b", &[9]);
    t.respond("c", &[]);

    t.game.play_hand(&PlayerId::new("a")).await.unwrap();

    assert!(!t.game.players().is_active(&PlayerId::new("b")));
    let notices = t.private_messages("b");
    assert!(
        notices
            .iter()
            .any(|m| m["message_type"] == "error" && m["error"] == "cards: Invalid list of cards")
    );

    let events = t.drain_events();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::DeadPlayer { player } if player.id == PlayerId::new("b")))
    );
    // The hand still completed for the others.
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver)));
}

#[tokio::test]
async fn test_pots_update_follows_new_game() {
    let mut t = Table::quiet(&[("a", 100), ("b", 100)]);
    t.respond("a", &[]);
    t.respond("b", &[]);

    t.game.play_hand(&PlayerId::new("a")).await.unwrap();

    let events = t.drain_events();
    let new_game = events
        .iter()
        .position(|e| matches!(e, GameEvent::NewGame { .. }))
        .unwrap();
    let pots_update = events
        .iter()
        .position(|e| matches!(e, GameEvent::PotsUpdate { .. }))
        .unwrap();
    assert!(new_game < pots_update);

    match &events[pots_update] {
        GameEvent::PotsUpdate { pots, .. } => {
            let total: Usd = pots.iter().map(|p| p.money).sum();
            assert_eq!(total, 20);
        }
        _ => unreachable!(),
    }
}
