//! Game-wide constants: table limits, hand geometry, and the timing
//! values remote clients rely on for rendering countdowns.

use std::time::Duration;

use super::entities::Value;

/// Minimum number of active players required for a hand to run.
pub const MIN_PLAYERS: usize = 2;

/// A traditional deck is stripped down depending on table size, which
/// caps the table at five players (rank floor 6).
pub const MAX_PLAYERS: usize = 5;

/// Number of cards dealt to each player.
pub const HAND_SIZE: usize = 5;

/// Maximum number of cards a player may discard during the exchange.
pub const MAX_DISCARDS: usize = 4;

/// Highest card value. Aces play high and, in a straight, low against
/// the deck's rank floor.
pub const ACE: Value = 14;

/// How long a player has to respond to a change-cards request. This is
/// the deadline advertised to the player.
pub const CHANGE_CARDS_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a player has to respond during a betting round.
pub const BET_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra slack added to the *enforced* receive deadline to absorb clock
/// and transport skew. The deadline advertised in the player-action
/// event deliberately excludes this.
pub const TIMEOUT_TOLERANCE: Duration = Duration::from_secs(2);

// Presentation pacing at named checkpoints. Semantically no-op delays;
// see `Pacing` for the stub-to-zero knob used by tests.
pub const WAIT_AFTER_CARDS_ASSIGNMENT: Duration = Duration::ZERO;
pub const WAIT_AFTER_BET: Duration = Duration::from_secs(2);
pub const WAIT_AFTER_WINNER_DESIGNATION: Duration = Duration::from_secs(5);
pub const WAIT_AFTER_HAND: Duration = Duration::ZERO;
pub const WAIT_AFTER_CARDS_CHANGE: Duration = Duration::ZERO;

/// Rank floor for a table of the given size: 9 with 2 players, 8 with
/// three, 7 with four, 6 with five.
#[must_use]
pub fn lowest_rank_for(player_count: usize) -> Value {
    11u8.saturating_sub(player_count as Value)
}
