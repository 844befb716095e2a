use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
};

use super::constants;
use crate::net::channel::PlayerChannel;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (jack=11u8 ... ace=14u8) and
/// a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// A stripped deck with a discard pile. Cards popped during the
/// exchange are matched by cards pushed back, so the total card count
/// is conserved for the duration of a hand.
#[derive(Clone, Debug)]
pub struct Deck {
    stock: Vec<Card>,
    discards: VecDeque<Card>,
}

impl Deck {
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            stock: cards,
            discards: VecDeque::new(),
        }
    }

    /// Draw `n` cards from the top of the stock, reshuffling the
    /// discard pile underneath when the stock runs dry.
    pub fn pop_cards(&mut self, n: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(n);
        for _ in 0..n {
            if self.stock.is_empty() {
                let mut recycled: Vec<Card> = self.discards.drain(..).collect();
                recycled.shuffle(&mut rand::rng());
                self.stock = recycled;
            }
            if let Some(card) = self.stock.pop() {
                cards.push(card);
            }
        }
        cards
    }

    /// Return discarded cards to the bottom of the deck.
    pub fn push_cards(&mut self, cards: Vec<Card>) {
        self.discards.extend(cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stock.len() + self.discards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds shuffled decks with a fixed rank floor. The floor depends on
/// the table size and is decided once per game.
#[derive(Clone, Copy, Debug)]
pub struct DeckFactory {
    lowest_rank: Value,
}

impl DeckFactory {
    #[must_use]
    pub fn new(lowest_rank: Value) -> Self {
        Self { lowest_rank }
    }

    #[must_use]
    pub fn lowest_rank(&self) -> Value {
        self.lowest_rank
    }

    #[must_use]
    pub fn create_deck(&self) -> Deck {
        let mut cards: Vec<Card> = (self.lowest_rank..=constants::ACE)
            .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
            .collect();
        cards.shuffle(&mut rand::rng());
        Deck::new(cards)
    }
}

/// Type alias for whole dollars. All bets and player stacks are
/// represented as whole dollars (there's no point arguing over
/// pennies).
pub type Usd = u32;

/// Opening bets for a betting round (e.g. blinds), keyed by player id.
pub type Bets = BTreeMap<PlayerId, Usd>;

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The public face of a player, safe to embed in outbound events.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub money: Usd,
}

impl fmt::Display for PlayerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${})", self.name, self.money)
    }
}

/// A seated player: identity, stack, activity flag, and the message
/// channel used to reach them.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub money: Usd,
    pub active: bool,
    pub channel: PlayerChannel,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: &str, money: Usd, channel: PlayerChannel) -> Self {
        Self {
            id,
            name: name.to_string(),
            money,
            active: true,
            channel,
        }
    }

    pub fn take_money(&mut self, amount: Usd) {
        self.money = self.money.saturating_sub(amount);
    }

    pub fn add_money(&mut self, amount: Usd) {
        self.money += amount;
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            name: self.name.clone(),
            money: self.money,
        }
    }
}

/// Ordered roster of players for one table. Insertion order is seating
/// order; rotation always starts immediately clockwise of the dealer
/// and skips inactive players.
#[derive(Debug, Default)]
pub struct GamePlayers {
    players: Vec<Player>,
}

impl GamePlayers {
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Clear per-hand state: everyone with a seat starts the hand
    /// active.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.active = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    #[must_use]
    pub fn active_views(&self) -> Vec<PlayerView> {
        self.active().map(Player::view).collect()
    }

    #[must_use]
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn is_active(&self, id: &PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.active)
    }

    /// Ids of active players in turn order for a hand: starting with
    /// the player immediately after the dealer and ending with the
    /// dealer. Callers must re-check activity before acting on an id,
    /// since earlier turns in the same rotation may eliminate players.
    #[must_use]
    pub fn round(&self, dealer_id: &PlayerId) -> Vec<PlayerId> {
        let n = self.players.len();
        let dealer_idx = self
            .players
            .iter()
            .position(|p| &p.id == dealer_id)
            .unwrap_or(n.saturating_sub(1));
        (1..=n)
            .map(|offset| &self.players[(dealer_idx + offset) % n])
            .filter(|p| p.active)
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn deactivate(&mut self, id: &PlayerId) {
        if let Some(player) = self.get_mut(id) {
            player.active = false;
        }
    }

    #[must_use]
    pub fn count_active(&self) -> usize {
        self.active().count()
    }

    #[must_use]
    pub fn count_active_with_money(&self) -> usize {
        self.active().filter(|p| p.money > 0).count()
    }
}
