//! Rule engine - the turn state machine over the core card model
//!
//! The engine owns one [`Game`]: roster, deck, phase, turn pointer, and the
//! final-round bookkeeping. It is synchronous and holds no locks; the session
//! layer serializes access.
//!
//! # Flow
//!
//! ```text
//! Lobby --start--> InitialReveal --2 reveals each--> AwaitingDraw
//! AwaitingDraw --pick--> AwaitingDecision --exchange--> AwaitingDraw (next seat)
//!                                         --discard--> AwaitingReveal --reveal--> AwaitingDraw
//! final round complete --> RoundOver --start--> AwaitingDraw | InitialReveal
//!                      \-> MatchOver (some total >= 100)
//! ```
//!
//! # Example
//!
//! ```
//! use skyjo_engine::{Game, GameConfig};
//! use skyjo_engine::types::{Intent, Phase, PlayerId};
//!
//! let mut game = Game::new(GameConfig { seed: Some(7), ..GameConfig::default() });
//! game.add_player(PlayerId(0), "ada").unwrap();
//! game.add_player(PlayerId(1), "bob").unwrap();
//!
//! let outcome = game.apply(PlayerId(0), Intent::Start).unwrap();
//! assert_eq!(outcome.phase, Phase::InitialReveal);
//! assert_eq!(game.snapshot().players.len(), 2);
//! ```

pub mod error;
pub mod event;
pub mod game;
pub mod snapshot;

pub use skyjo_core as core;
pub use skyjo_types as types;

pub use error::{ErrorKind, GameError};
pub use event::{GameEvent, Outcome};
pub use game::{Game, GameConfig};
pub use snapshot::{CardView, GameSnapshot, PhaseLower, PlayerView};
