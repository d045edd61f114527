//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the card-level building blocks of the rule engine.
//! It has **zero dependencies** on networking or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical decks (for tests and replays)
//! - **Testable**: Unit tests for every rule in isolation
//! - **Portable**: Usable by the server, the client mirror, or a headless harness
//!
//! # Module Structure
//!
//! - [`deck`]: 150-card draw pile and face-up discard pile, with recycling
//! - [`hand`]: 3-row card grid with column clearing and compaction
//! - [`player`]: seat identity, hand, cumulative score
//! - [`rng`]: seeded ChaCha shuffling and per-build card identities
//! - [`scoring`]: round tally, round-ender penalty, ranking
//!
//! The turn state machine that drives these lives in `skyjo-engine`.
//!
//! # Example
//!
//! ```
//! use skyjo_core::{Deck, Hand};
//! use skyjo_core::types::{DECK_SIZE, HAND_SIZE};
//!
//! let mut deck = Deck::build_seeded(12345);
//! let cards: Vec<_> = (0..HAND_SIZE).filter_map(|_| deck.draw()).collect();
//! let hand = Hand::new(cards);
//!
//! assert_eq!(hand.columns(), 4);
//! assert_eq!(deck.draw_len(), DECK_SIZE - HAND_SIZE);
//! ```

pub mod deck;
pub mod hand;
pub mod player;
pub mod rng;
pub mod scoring;

pub use skyjo_types as types;

// Re-export commonly used types for convenience
pub use deck::{composition, Deck, DeckError};
pub use hand::{ClearedColumns, Hand};
pub use player::Player;
pub use rng::{CardIdGen, ShuffleRng};
pub use scoring::{
    match_over, penalty_applies, round_points, score_round, PlayerRoundScore, RoundResult,
};
