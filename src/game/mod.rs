//! Core game logic: entities, scoring, pots, events, and the hand
//! engine with its card-exchange protocol.

pub mod betting;
pub mod constants;
pub mod engine;
pub mod entities;
pub mod events;
mod exchange;
pub mod pots;
pub mod scores;

pub use betting::{BetHandler, HandTable, PassiveBetHandler};
pub use engine::{GameError, GameSettings, HandFlow, Pacing, TraditionalGame};
pub use events::{ChannelEventDispatcher, GameEvent, GameEventDispatcher};
