//! The hand engine: drives one complete hand of traditional draw
//! poker through a fixed phase sequence, pulling cards, scores, pots,
//! and betting from their collaborators and emitting an event at every
//! milestone.

use log::{debug, info, warn};
use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

use super::betting::{BetHandler, HandTable};
use super::constants::{self, HAND_SIZE, MIN_PLAYERS};
use super::entities::{Bets, Deck, DeckFactory, GamePlayers, PlayerId, PlayerView, Usd};
use super::events::{GameEventDispatcher, ShowdownEntry};
use super::pots::Pots;
use super::scores::{Scores, TraditionalScoreDetector};
use crate::net::messages::ServerMessage;

/// Fatal hand errors. These abort `play_hand` entirely; they are never
/// recovered within the engine.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    #[error("not enough players")]
    NotEnoughPlayers,
    #[error("betting round failed: {0}")]
    BetRound(String),
}

/// Outcome of a phase: either the hand goes on, or it has been decided
/// early (fewer than two contenders left) and the remaining betting
/// and exchange phases are skipped. Payout still runs exactly once.
///
/// This is a control signal, not an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandFlow {
    Continue,
    Decided,
}

/// Presentation pacing at named checkpoints. The sleeps are UX pacing
/// for observers, not scheduling requirements; tests zero them without
/// touching any logic.
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    pub after_cards_assignment: std::time::Duration,
    pub after_bet: std::time::Duration,
    pub after_winner_designation: std::time::Duration,
    pub after_hand: std::time::Duration,
    pub after_cards_change: std::time::Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_cards_assignment: constants::WAIT_AFTER_CARDS_ASSIGNMENT,
            after_bet: constants::WAIT_AFTER_BET,
            after_winner_designation: constants::WAIT_AFTER_WINNER_DESIGNATION,
            after_hand: constants::WAIT_AFTER_HAND,
            after_cards_change: constants::WAIT_AFTER_CARDS_CHANGE,
        }
    }
}

impl Pacing {
    /// No pauses at all.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            after_cards_assignment: std::time::Duration::ZERO,
            after_bet: std::time::Duration::ZERO,
            after_winner_designation: std::time::Duration::ZERO,
            after_hand: std::time::Duration::ZERO,
            after_cards_change: std::time::Duration::ZERO,
        }
    }
}

/// Per-game configuration.
#[derive(Clone, Copy, Debug)]
pub struct GameSettings {
    /// Mandatory bet collected from every active player at hand start.
    pub blind: Usd,
    pub pacing: Pacing,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            blind: 10,
            pacing: Pacing::default(),
        }
    }
}

/// One table's game of traditional draw poker. Runs as a single
/// cooperative task: the only suspension points are waits on player
/// channels and the pacing pauses, so no two player-turn operations
/// within one hand ever overlap.
pub struct TraditionalGame {
    pub(super) id: Uuid,
    pub(super) blind: Usd,
    pub(super) pacing: Pacing,
    pub(super) players: GamePlayers,
    pub(super) dispatcher: Box<dyn GameEventDispatcher>,
    pub(super) bet_handler: Box<dyn BetHandler>,
    pub(super) deck_factory: DeckFactory,
    pub(super) score_detector: TraditionalScoreDetector,
}

impl TraditionalGame {
    /// Wire up a game for the given roster. The deck's rank floor
    /// follows the table size: 9 with two players, 8 with three, 7
    /// with four, 6 with five.
    #[must_use]
    pub fn new(
        players: GamePlayers,
        dispatcher: Box<dyn GameEventDispatcher>,
        bet_handler: Box<dyn BetHandler>,
        settings: GameSettings,
    ) -> Self {
        let lowest_rank = constants::lowest_rank_for(players.iter().count());
        Self {
            id: Uuid::new_v4(),
            blind: settings.blind,
            pacing: settings.pacing,
            players,
            dispatcher,
            bet_handler,
            deck_factory: DeckFactory::new(lowest_rank),
            score_detector: TraditionalScoreDetector::new(lowest_rank),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn players(&self) -> &GamePlayers {
        &self.players
    }

    /// Play one complete hand with the given dealer. Blinds, deal, two
    /// betting rounds around a card exchange, then showdown and
    /// payout. The per-hand deck, scores, and pots live only for the
    /// duration of this call; player money and the roster survive it.
    pub async fn play_hand(&mut self, dealer_id: &PlayerId) -> Result<(), GameError> {
        info!("game {}: starting hand, dealer {dealer_id}", self.id);

        self.players.reset();
        let mut deck = self.deck_factory.create_deck();
        let mut scores = Scores::new(self.score_detector);
        let mut pots = Pots::default();

        let blind_bets = self.collect_blinds()?;
        self.dispatcher.new_game_event(
            self.id,
            &self.players.active_views(),
            dealer_id,
            &blind_bets,
        );

        // The blinds go straight into the pot before any betting.
        pots.add_bets(&blind_bets);
        self.dispatcher
            .pots_update_event(self.players.active_views(), &pots);

        self.run_hand_phases(dealer_id, &mut deck, &mut scores, &mut pots)
            .await?;

        if self.players.count_active() > 1 {
            self.showdown(&scores);
        }
        self.pay_winners(&mut pots, &scores).await;
        sleep(self.pacing.after_hand).await;

        self.dispatcher.game_over_event();
        info!("game {}: hand over", self.id);
        Ok(())
    }

    /// The phase sequence between the deal and the final bet. Returns
    /// as soon as a phase decides the hand; the caller always runs
    /// showdown/payout next, so an early return here is the jump
    /// straight to them.
    async fn run_hand_phases(
        &mut self,
        dealer_id: &PlayerId,
        deck: &mut Deck,
        scores: &mut Scores,
        pots: &mut Pots,
    ) -> Result<(), GameError> {
        self.assign_cards(dealer_id, deck, scores);
        if self.hand_decided() == HandFlow::Decided {
            return Ok(());
        }
        sleep(self.pacing.after_cards_assignment).await;

        debug!("game {}: first bet round", self.id);
        self.bet_round(dealer_id, Bets::new(), pots).await?;
        if self.hand_decided() == HandFlow::Decided {
            return Ok(());
        }
        sleep(self.pacing.after_bet).await;

        debug!("game {}: card exchange", self.id);
        self.change_cards_round(dealer_id, deck, scores).await;
        if self.hand_decided() == HandFlow::Decided {
            return Ok(());
        }
        sleep(self.pacing.after_cards_change).await;

        // No point betting further when at most one player can still
        // wager.
        if self.players.count_active_with_money() < MIN_PLAYERS {
            return Ok(());
        }

        debug!("game {}: final bet round", self.id);
        self.bet_round(dealer_id, Bets::new(), pots).await?;
        sleep(self.pacing.after_bet).await;
        Ok(())
    }

    /// Early-termination check run after each phase.
    fn hand_decided(&self) -> HandFlow {
        if self.players.count_active() < MIN_PLAYERS {
            HandFlow::Decided
        } else {
            HandFlow::Continue
        }
    }

    /// Remove players who cannot cover the blind, then debit the blind
    /// from everyone left. Unlike later rounds, the blind is mandatory
    /// and collected from every active player.
    fn collect_blinds(&mut self) -> Result<Bets, GameError> {
        let broke: Vec<PlayerId> = self
            .players
            .active()
            .filter(|p| p.money < self.blind)
            .map(|p| p.id.clone())
            .collect();
        for player_id in broke {
            if let Some(view) = self.view_of(&player_id) {
                debug!("game {}: {player_id} cannot cover the blind", self.id);
                self.players.deactivate(&player_id);
                self.dispatcher.dead_player_event(view);
            }
        }

        if self.players.count_active() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        let mut bets = Bets::new();
        let active_ids: Vec<PlayerId> = self.players.active().map(|p| p.id.clone()).collect();
        for player_id in active_ids {
            if let Some(player) = self.players.get_mut(&player_id) {
                player.take_money(self.blind);
                bets.insert(player_id, self.blind);
            }
        }
        Ok(bets)
    }

    /// Deal a fresh hand of five cards to every active player and push
    /// it to them privately.
    fn assign_cards(&mut self, dealer_id: &PlayerId, deck: &mut Deck, scores: &mut Scores) {
        for player_id in self.players.round(dealer_id) {
            let cards = deck.pop_cards(HAND_SIZE);
            scores.assign_cards(player_id.clone(), cards);
            self.send_player_score(&player_id, scores);
        }
    }

    /// Hand the table to the external betting algorithm for one round.
    async fn bet_round(
        &mut self,
        dealer_id: &PlayerId,
        opening_bets: Bets,
        pots: &mut Pots,
    ) -> Result<(), GameError> {
        let Self {
            players,
            dispatcher,
            bet_handler,
            ..
        } = self;
        let mut table = HandTable {
            players,
            pots,
            dispatcher: dispatcher.as_mut(),
        };
        bet_handler
            .bet_round(dealer_id, opening_bets, &mut table)
            .await
    }

    /// Reveal the remaining hands for comparison.
    fn showdown(&mut self, scores: &Scores) {
        let entries: Vec<ShowdownEntry> = self
            .players
            .active()
            .filter_map(|player| {
                scores.player_score(&player.id).map(|score| ShowdownEntry {
                    player: player.view(),
                    cards: scores.player_cards(&player.id).to_vec(),
                    score,
                })
            })
            .collect();
        debug!("game {}: showdown with {} hands", self.id, entries.len());
        self.dispatcher.showdown_event(entries);
    }

    /// Resolve the pots to their winners. Runs exactly once per hand,
    /// whether the hand completed naturally or terminated early.
    async fn pay_winners(&mut self, pots: &mut Pots, scores: &Scores) {
        let payouts = pots.pay_winners(scores, &mut self.players);
        for payout in payouts {
            info!(
                "game {}: pot of ${} goes to {:?}",
                self.id, payout.pot.money, payout.winner_ids
            );
            self.dispatcher
                .winner_designation_event(&payout, self.players.active_views());
            sleep(self.pacing.after_winner_designation).await;
        }
    }

    /// Push a player's current hand and score to them privately.
    /// Best-effort: a dead channel here surfaces on the player's next
    /// turn anyway.
    pub(super) fn send_player_score(&self, player_id: &PlayerId, scores: &Scores) {
        let Some(score) = scores.player_score(player_id) else {
            return;
        };
        let Some(player) = self.players.get(player_id) else {
            return;
        };
        let message = ServerMessage::SetCards {
            cards: scores.player_cards(player_id).to_vec(),
            score,
        };
        if let Err(err) = player.channel.send_message(&message) {
            warn!("game {}: cannot reach {player_id}: {err}", self.id);
        }
    }

    pub(super) fn view_of(&self, player_id: &PlayerId) -> Option<PlayerView> {
        self.players.get(player_id).map(|p| p.view())
    }
}
