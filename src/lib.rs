//! # Draw Poker
//!
//! A hand engine for multiplayer traditional draw poker played over a
//! message channel. The engine owns the hand lifecycle (blind
//! collection, dealing, two betting rounds around a card exchange,
//! showdown and payout) and notifies an event sink at each milestone.
//!
//! ## Architecture
//!
//! One hand moves through a fixed phase sequence:
//!
//! - **Reset**: clear per-hand roster state
//! - **CollectBlinds**: mandatory blind from every active player
//! - **Deal**: five cards each, pushed privately
//! - **FirstBet / FinalBet**: delegated to an external [`BetHandler`]
//! - **CardExchange**: each player may discard up to four cards under
//!   a hard deadline; misbehaving players are excised, the hand goes on
//! - **Showdown / Payout / GameOver**
//!
//! Each table runs as a single cooperative tokio task; waits on player
//! channels and pacing pauses are the only suspension points. Early
//! termination (fewer than two contenders) is a typed control signal
//! that jumps straight to payout, never an error.
//!
//! ## Core Modules
//!
//! - [`game`]: entities, scoring, pots, events, and the hand engine
//! - [`net`]: player channels, wire messages, and protocol errors
//!
//! ## Example
//!
//! ```
//! use draw_poker::{
//!     ChannelEventDispatcher, GamePlayers, GameSettings, PassiveBetHandler, Player, PlayerId,
//!     TraditionalGame, net::PlayerChannel,
//! };
//!
//! let mut remotes = Vec::new();
//! let players = GamePlayers::new(
//!     ["alice", "bob"]
//!         .into_iter()
//!         .map(|name| {
//!             let (channel, remote) = PlayerChannel::pair();
//!             remotes.push(remote);
//!             Player::new(PlayerId::new(name), name, 100, channel)
//!         })
//!         .collect(),
//! );
//! let (dispatcher, _events) = ChannelEventDispatcher::new();
//! let game = TraditionalGame::new(
//!     players,
//!     Box::new(dispatcher),
//!     Box::new(PassiveBetHandler),
//!     GameSettings::default(),
//! );
//! assert_eq!(game.players().count_active(), 2);
//! ```

/// Player-facing messaging: channels, wire messages, protocol errors.
pub mod net;
pub use net::{ChannelError, MessageError, PlayerChannel, RemoteEnd, ServerMessage};

/// Core game logic, entities, and the hand engine.
pub mod game;
pub use game::{
    BetHandler, ChannelEventDispatcher, GameError, GameEvent, GameEventDispatcher, GameSettings,
    HandFlow, HandTable, Pacing, PassiveBetHandler, TraditionalGame,
    constants,
    entities::{Bets, Card, Deck, DeckFactory, GamePlayers, Player, PlayerId, PlayerView, Suit, Usd},
    pots::Pots,
    scores::{Rank, Score, Scores, TraditionalScoreDetector},
};
