//! Pot bookkeeping: per-player contributions, side-pot layering, and
//! payout resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entities::{Bets, GamePlayers, PlayerId, Usd};
use super::scores::Scores;

/// One layer of the pot: the chips in it and the players entitled to
/// contest it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotView {
    pub money: Usd,
    pub player_ids: Vec<PlayerId>,
}

/// Chips paid out of one pot layer to its winners.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub pot: PotView,
    pub winner_ids: Vec<PlayerId>,
    pub money_split: Usd,
}

/// Aggregated wagers for one hand. Contributions are layered into side
/// pots on demand: one layer per distinct contribution level, each
/// contested by the players who reached that level.
#[derive(Debug, Default)]
pub struct Pots {
    contributions: BTreeMap<PlayerId, Usd>,
}

impl Pots {
    /// Fold a bet map into the pot.
    pub fn add_bets(&mut self, bets: &Bets) {
        for (player_id, amount) in bets {
            *self.contributions.entry(player_id.clone()).or_default() += amount;
        }
    }

    #[must_use]
    pub fn total(&self) -> Usd {
        self.contributions.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Current side-pot layering, smallest contribution level first.
    #[must_use]
    pub fn side_pots(&self) -> Vec<PotView> {
        let mut levels: Vec<Usd> = self.contributions.values().copied().collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut floor: Usd = 0;
        for level in levels {
            let player_ids: Vec<PlayerId> = self
                .contributions
                .iter()
                .filter(|&(_, &amount)| amount >= level)
                .map(|(id, _)| id.clone())
                .collect();
            let money = (level - floor) * player_ids.len() as Usd;
            pots.push(PotView { money, player_ids });
            floor = level;
        }
        pots
    }

    /// Resolve every pot layer to the best-scoring active contributors
    /// and credit their stacks. Chips that don't divide evenly go to
    /// the earliest winners in the payout list. Drains the pot.
    pub fn pay_winners(&mut self, scores: &Scores, players: &mut GamePlayers) -> Vec<Payout> {
        let mut payouts = Vec::new();
        for pot in self.side_pots() {
            let eligible: Vec<&PlayerId> = pot
                .player_ids
                .iter()
                .filter(|id| players.is_active(id))
                .collect();
            let winner_ids = if eligible.len() == 1 {
                // Everyone else folded or busted out of the hand, no
                // comparison needed.
                vec![eligible[0].clone()]
            } else {
                scores.winners(eligible)
            };
            if winner_ids.is_empty() {
                continue;
            }

            let share = pot.money / winner_ids.len() as Usd;
            let mut remainder = pot.money % winner_ids.len() as Usd;
            for winner_id in &winner_ids {
                let extra = if remainder > 0 { 1 } else { 0 };
                remainder = remainder.saturating_sub(1);
                if let Some(player) = players.get_mut(winner_id) {
                    player.add_money(share + extra);
                }
            }
            payouts.push(Payout {
                pot,
                winner_ids,
                money_split: share,
            });
        }
        self.contributions.clear();
        payouts
    }
}
