//! The betting-round seam.
//!
//! The general betting algorithm (raises, calls, folds, pot math) is
//! supplied from outside the hand engine. The engine hands it a
//! [`HandTable`] scoped to the current hand and expects it to leave the
//! roster and pots consistent when it returns.

use async_trait::async_trait;

use super::engine::GameError;
use super::entities::{Bets, GamePlayers, PlayerId};
use super::events::GameEventDispatcher;
use super::pots::Pots;

/// Mutable view of the hand state a betting round may touch. Passing
/// it explicitly keeps the serialization requirement visible: only one
/// round runs at a time, and it owns the table while it runs.
pub struct HandTable<'a> {
    pub players: &'a mut GamePlayers,
    pub pots: &'a mut Pots,
    pub dispatcher: &'a mut dyn GameEventDispatcher,
}

/// Runs one betting round, starting from `opening_bets` (e.g. blinds
/// already on the table). Implementations fold players by deactivating
/// them on the roster and record wagers into the pots.
#[async_trait]
pub trait BetHandler: Send {
    async fn bet_round(
        &mut self,
        dealer_id: &PlayerId,
        opening_bets: Bets,
        table: &mut HandTable<'_>,
    ) -> Result<(), GameError>;
}

/// Bet handler in which nobody wagers: every player checks. Useful as
/// a placeholder in tests and for variants played without betting.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassiveBetHandler;

#[async_trait]
impl BetHandler for PassiveBetHandler {
    async fn bet_round(
        &mut self,
        _dealer_id: &PlayerId,
        opening_bets: Bets,
        table: &mut HandTable<'_>,
    ) -> Result<(), GameError> {
        table.pots.add_bets(&opening_bets);
        Ok(())
    }
}
