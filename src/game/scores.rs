//! Hand scoring for traditional draw poker.
//!
//! Traditional poker is played with a stripped deck, which changes the
//! rank ladder relative to hold'em: with fewer cards per suit a flush
//! is harder to make than a full house, so it ranks above it.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use super::constants::{ACE, HAND_SIZE};
use super::entities::{Card, PlayerId, Value};

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Rank {
    HighestCard,
    Pair,
    DoublePair,
    ThreeOfAKind,
    Straight,
    FullHouse,
    Flush,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighestCard => "hi",
            Self::Pair => "1p",
            Self::DoublePair => "2p",
            Self::ThreeOfAKind => "3k",
            Self::Straight => "s8",
            Self::FullHouse => "fh",
            Self::Flush => "fs",
            Self::FourOfAKind => "4k",
            Self::StraightFlush => "sf",
        };
        write!(f, "{repr}")
    }
}

/// A scored hand: the rank plus tiebreak values in descending order of
/// significance. The derived ordering compares rank first, then the
/// tiebreak values lexicographically.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Score {
    pub rank: Rank,
    pub values: Vec<Value>,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank)
    }
}

/// Scores 5-card hands against a deck with a known rank floor. The
/// floor matters for ace-low straights: the ace can sit directly under
/// the lowest card in the deck.
#[derive(Clone, Copy, Debug)]
pub struct TraditionalScoreDetector {
    lowest_rank: Value,
}

impl TraditionalScoreDetector {
    #[must_use]
    pub fn new(lowest_rank: Value) -> Self {
        Self { lowest_rank }
    }

    #[must_use]
    pub fn detect(&self, cards: &[Card]) -> Score {
        debug_assert_eq!(cards.len(), HAND_SIZE);

        let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
        for card in cards {
            *counts.entry(card.0).or_default() += 1;
        }

        // Group values by multiplicity, highest count first, then by
        // value, so they serve directly as tiebreakers.
        let mut groups: Vec<(usize, Value)> =
            counts.iter().map(|(&value, &count)| (count, value)).collect();
        groups.sort_unstable_by(|a, b| b.cmp(a));
        let values: Vec<Value> = groups.iter().map(|&(_, value)| value).collect();

        let flush = cards.iter().all(|c| c.1 == cards[0].1);
        let straight_high = self.straight_high(&counts);

        let rank = match (groups[0].0, groups.get(1).map(|g| g.0)) {
            _ if flush && straight_high.is_some() => Rank::StraightFlush,
            (4, _) => Rank::FourOfAKind,
            _ if flush => Rank::Flush,
            (3, Some(2)) => Rank::FullHouse,
            _ if straight_high.is_some() => Rank::Straight,
            (3, _) => Rank::ThreeOfAKind,
            (2, Some(2)) => Rank::DoublePair,
            (2, _) => Rank::Pair,
            _ => Rank::HighestCard,
        };

        match straight_high {
            Some(high) if rank == Rank::Straight || rank == Rank::StraightFlush => Score {
                rank,
                values: (0..HAND_SIZE as Value)
                    .map(|offset| high.saturating_sub(offset))
                    .collect(),
            },
            _ => Score { rank, values },
        }
    }

    /// Highest card of a straight, if the hand is one. The ace plays
    /// high or directly below the deck's rank floor.
    fn straight_high(&self, counts: &BTreeMap<Value, usize>) -> Option<Value> {
        if counts.len() != HAND_SIZE {
            return None;
        }
        let mut values: Vec<Value> = counts.keys().copied().collect();
        if values[0] == self.lowest_rank && values[HAND_SIZE - 1] == ACE {
            // Ace-low: treat the ace as sitting under the floor.
            values.pop();
            values.insert(0, self.lowest_rank - 1);
        }
        values
            .windows(2)
            .all(|w| w[1] == w[0] + 1)
            .then(|| values[HAND_SIZE - 1])
    }
}

/// Mapping of player id to their current hand, with scoring on demand.
/// After dealing, every tracked hand holds exactly `HAND_SIZE` cards.
#[derive(Debug)]
pub struct Scores {
    detector: TraditionalScoreDetector,
    cards: BTreeMap<PlayerId, Vec<Card>>,
}

impl Scores {
    #[must_use]
    pub fn new(detector: TraditionalScoreDetector) -> Self {
        Self {
            detector,
            cards: BTreeMap::new(),
        }
    }

    pub fn assign_cards(&mut self, player_id: PlayerId, cards: Vec<Card>) {
        self.cards.insert(player_id, cards);
    }

    #[must_use]
    pub fn player_cards(&self, player_id: &PlayerId) -> &[Card] {
        self.cards.get(player_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn player_score(&self, player_id: &PlayerId) -> Option<Score> {
        self.cards
            .get(player_id)
            .map(|cards| self.detector.detect(cards))
    }

    /// Best-scoring players among the candidates. Ties all win.
    #[must_use]
    pub fn winners<'a, I>(&self, candidates: I) -> Vec<PlayerId>
    where
        I: IntoIterator<Item = &'a PlayerId>,
    {
        let mut best: Option<Score> = None;
        let mut winners = Vec::new();
        for id in candidates {
            let Some(score) = self.player_score(id) else {
                continue;
            };
            match &best {
                Some(b) if score < *b => {}
                Some(b) if score == *b => winners.push(id.clone()),
                _ => {
                    best = Some(score);
                    winners = vec![id.clone()];
                }
            }
        }
        winners
    }
}
